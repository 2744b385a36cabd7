// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live message feed: a long-lived subscription that re-delivers the full
//! current history window on every underlying change.
//!
//! Each feed is a tokio task woken by the database change signal. Delivery
//! is always a complete snapshot, never a diff, so optimistic local state is
//! superseded implicitly by the next emission.

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::database::Database;
use crate::models::Message;
use crate::queries;

/// Maximum number of messages delivered per snapshot. The window keeps the
/// newest entries; older history falls off the front.
pub const RECENT_WINDOW: i64 = 50;

/// Capacity of the snapshot delivery channel.
const FEED_CHANNEL_CAPACITY: usize = 16;

/// A live subscription to one user's message history.
///
/// Snapshots arrive via [`recv`](MessageFeed::recv); the subscription is
/// released with [`cancel`](MessageFeed::cancel) or by dropping the feed.
pub struct MessageFeed {
    rx: mpsc::Receiver<Vec<Message>>,
    task: Option<JoinHandle<()>>,
}

impl MessageFeed {
    /// Awaits the next full snapshot. Returns `None` once the feed is
    /// cancelled or the store is gone.
    pub async fn recv(&mut self) -> Option<Vec<Message>> {
        self.rx.recv().await
    }

    /// Cancels the subscription. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.rx.close();
    }

    /// A feed that delivers a single empty snapshot and then ends. Used when
    /// there is no user to subscribe for or the store is unavailable.
    pub(crate) fn empty() -> Self {
        let (tx, rx) = mpsc::channel(1);
        // The send cannot fail: the receiver is alive and the buffer empty.
        let _ = tx.try_send(Vec::new());
        Self { rx, task: None }
    }

    /// Spawns the feed task for `user_id` over the given database handle.
    pub(crate) fn spawn(db: Database, user_id: String) -> Self {
        let (tx, rx) = mpsc::channel(FEED_CHANNEL_CAPACITY);
        // Subscribe to the change signal before the first query so a write
        // landing between them still triggers a re-delivery.
        let mut changes = db.changes();

        let task = tokio::spawn(async move {
            loop {
                let snapshot = load_snapshot(&db, &user_id).await;
                if tx.send(snapshot).await.is_err() {
                    // Receiver dropped: the subscriber went away.
                    break;
                }

                match changes.recv().await {
                    Ok(()) => {}
                    // Snapshots are total, so skipped signals lose nothing.
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(user_id = %user_id, skipped, "feed lagged behind change signal");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Self {
            rx,
            task: Some(task),
        }
    }
}

impl Drop for MessageFeed {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Queries the current window, downgrading delivery failures to an empty
/// snapshot. A live feed has no rejection channel to its subscriber, so the
/// error is logged for operator diagnosis instead.
async fn load_snapshot(db: &Database, user_id: &str) -> Vec<Message> {
    match queries::messages::recent_for_user(db, user_id, RECENT_WINDOW).await {
        Ok(messages) => messages,
        Err(e) => {
            error!(user_id = %user_id, error = %e, "live feed query failed, delivering empty snapshot");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageDraft;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("feed.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn feed_delivers_initial_snapshot_even_when_empty() {
        let (db, _dir) = setup_db().await;
        let mut feed = MessageFeed::spawn(db.clone(), "u1".to_string());

        let snapshot = feed.recv().await.unwrap();
        assert!(snapshot.is_empty());

        feed.cancel();
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn feed_redelivers_on_every_insert() {
        let (db, _dir) = setup_db().await;
        let mut feed = MessageFeed::spawn(db.clone(), "u1".to_string());

        // Initial (empty) snapshot.
        assert!(feed.recv().await.unwrap().is_empty());

        queries::messages::insert_message(&db, &MessageDraft::user("hello"), "u1")
            .await
            .unwrap();
        db.notify_changed();

        let snapshot = feed.recv().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].text, "hello");

        queries::messages::insert_message(&db, &MessageDraft::ai("hi there"), "u1")
            .await
            .unwrap();
        db.notify_changed();

        let snapshot = feed.recv().await.unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[1].text, "hi there");

        feed.cancel();
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn feed_snapshot_never_exceeds_recent_window() {
        let (db, _dir) = setup_db().await;

        for i in 0..60 {
            queries::messages::insert_message(&db, &MessageDraft::user(format!("m{i}")), "u1")
                .await
                .unwrap();
        }

        let mut feed = MessageFeed::spawn(db.clone(), "u1".to_string());
        let snapshot = feed.recv().await.unwrap();
        assert_eq!(snapshot.len(), RECENT_WINDOW as usize);
        assert_eq!(snapshot.last().unwrap().text, "m59");

        feed.cancel();
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn cancelled_feed_stops_delivering() {
        let (db, _dir) = setup_db().await;
        let mut feed = MessageFeed::spawn(db.clone(), "u1".to_string());

        assert!(feed.recv().await.is_some());
        feed.cancel();

        queries::messages::insert_message(&db, &MessageDraft::user("late"), "u1")
            .await
            .unwrap();
        db.notify_changed();

        assert!(feed.recv().await.is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn empty_feed_delivers_one_empty_snapshot_then_ends() {
        let mut feed = MessageFeed::empty();
        assert_eq!(feed.recv().await, Some(Vec::new()));
        assert!(feed.recv().await.is_none());
    }
}
