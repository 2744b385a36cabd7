// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message query operations.

use chatternest_core::types::{ASSISTANT_USER_ID, SYSTEM_USER_ID};
use chatternest_core::ChatterNestError;
use chrono::{SecondsFormat, Utc};
use rusqlite::params;

use crate::database::Database;
use crate::models::{Message, MessageDraft, Sender};

/// Insert a new message with a store-assigned id and timestamp.
///
/// Returns the full persisted record. Inserts never overwrite: the id is a
/// fresh uuid on every call.
pub async fn insert_message(
    db: &Database,
    draft: &MessageDraft,
    user_id: &str,
) -> Result<Message, ChatterNestError> {
    let msg = Message {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        sender: draft.sender,
        text: draft.text.clone(),
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    let row = msg.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages (id, user_id, sender, text, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    row.id,
                    row.user_id,
                    row.sender.to_string(),
                    row.text,
                    row.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    Ok(msg)
}

/// Get the most recent `limit` messages visible to `user_id`, in
/// chronological order.
///
/// Visibility covers rows owned by the user plus the reserved assistant and
/// system sentinel owners. The query selects the newest rows first and the
/// result is reversed, so the cap always drops the oldest entries. Rows
/// sharing a millisecond timestamp fall back to insertion order.
pub async fn recent_for_user(
    db: &Database,
    user_id: &str,
    limit: i64,
) -> Result<Vec<Message>, ChatterNestError> {
    let user_id = user_id.to_string();
    let mut messages: Vec<Message> = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, sender, text, created_at
                 FROM messages WHERE user_id IN (?1, ?2, ?3)
                 ORDER BY created_at DESC, rowid DESC LIMIT ?4",
            )?;
            let rows = stmt.query_map(
                params![user_id, ASSISTANT_USER_ID, SYSTEM_USER_ID, limit],
                |row| {
                    Ok(Message {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        sender: row
                            .get::<_, String>(2)?
                            .parse()
                            .unwrap_or(Sender::System),
                        text: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                },
            )?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    messages.reverse();
    Ok(messages)
}

/// Delete every message owned by `user_id` as a single atomic statement.
///
/// Returns the number of rows removed; zero matches is a successful no-op.
pub async fn delete_for_user(db: &Database, user_id: &str) -> Result<usize, ChatterNestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute("DELETE FROM messages WHERE user_id = ?1", params![user_id])?;
            Ok(deleted)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamp() {
        let (db, _dir) = setup_db().await;

        let before = Utc::now();
        let msg = insert_message(&db, &MessageDraft::user("hello"), "u1")
            .await
            .unwrap();

        assert!(!msg.id.is_empty());
        assert_eq!(msg.sender, Sender::User);
        assert_eq!(msg.text, "hello");
        assert!(msg.created_at_time() >= before - chrono::Duration::seconds(1));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn recent_for_user_returns_chronological_order() {
        let (db, _dir) = setup_db().await;

        insert_message(&db, &MessageDraft::user("first"), "u1")
            .await
            .unwrap();
        insert_message(&db, &MessageDraft::ai("second"), "u1")
            .await
            .unwrap();
        insert_message(&db, &MessageDraft::user("third"), "u1")
            .await
            .unwrap();

        let messages = recent_for_user(&db, "u1", 50).await.unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].text, "first");
        assert_eq!(messages[1].text, "second");
        assert_eq!(messages[2].text, "third");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn recent_for_user_caps_to_most_recent() {
        let (db, _dir) = setup_db().await;

        for i in 0..60 {
            insert_message(&db, &MessageDraft::user(format!("msg {i}")), "u1")
                .await
                .unwrap();
        }

        let messages = recent_for_user(&db, "u1", 50).await.unwrap();
        assert_eq!(messages.len(), 50);
        // The cap drops the oldest entries, not the newest.
        assert_eq!(messages.last().unwrap().text, "msg 59");
        assert_eq!(messages.first().unwrap().text, "msg 10");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn sentinel_owned_rows_are_visible_to_every_user() {
        let (db, _dir) = setup_db().await;

        insert_message(&db, &MessageDraft::user("mine"), "u1")
            .await
            .unwrap();
        insert_message(&db, &MessageDraft::ai("broadcast"), ASSISTANT_USER_ID)
            .await
            .unwrap();
        insert_message(
            &db,
            &MessageDraft {
                sender: Sender::System,
                text: "notice".to_string(),
            },
            SYSTEM_USER_ID,
        )
        .await
        .unwrap();
        insert_message(&db, &MessageDraft::user("theirs"), "u2")
            .await
            .unwrap();

        let messages = recent_for_user(&db, "u1", 50).await.unwrap();
        let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["mine", "broadcast", "notice"]);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_for_user_removes_exactly_that_users_rows() {
        let (db, _dir) = setup_db().await;

        for _ in 0..3 {
            insert_message(&db, &MessageDraft::user("a"), "u1")
                .await
                .unwrap();
        }
        insert_message(&db, &MessageDraft::user("b"), "u2")
            .await
            .unwrap();

        let deleted = delete_for_user(&db, "u1").await.unwrap();
        assert_eq!(deleted, 3);

        assert!(recent_for_user(&db, "u1", 50).await.unwrap().is_empty());
        assert_eq!(recent_for_user(&db, "u2", 50).await.unwrap().len(), 1);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_for_user_with_no_rows_is_a_no_op() {
        let (db, _dir) = setup_db().await;
        let deleted = delete_for_user(&db, "nobody").await.unwrap();
        assert_eq!(deleted, 0);
        db.close().await.unwrap();
    }
}
