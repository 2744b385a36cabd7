// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Auth-driven feed lifecycle.
//!
//! Exactly one live message feed exists per signed-in user context. On every
//! auth state transition the previous subscription is released before the
//! next one attaches, so a new session never receives stale-user data from
//! an old feed. Snapshots are forwarded tagged with the owning uid; a
//! consumer can discard a late snapshot by checking the tag against the
//! current user.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use chatternest_core::types::{AuthUser, Message};
use chatternest_store::ChatStore;

/// A full history snapshot tagged with the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSnapshot {
    pub uid: String,
    pub messages: Vec<Message>,
}

/// Spawns the feed switcher: watches the auth state stream and keeps at most
/// one live feed attached, forwarding its snapshots into `tx`.
///
/// The task ends when the auth stream closes or the snapshot receiver is
/// dropped.
pub fn spawn_feed_switcher(
    store: Arc<ChatStore>,
    mut auth_rx: watch::Receiver<Option<AuthUser>>,
    tx: mpsc::Sender<UserSnapshot>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut active: Option<(String, JoinHandle<()>)> = None;

        loop {
            let user = auth_rx.borrow_and_update().clone();

            // Release the previous subscription before attaching the next.
            if let Some((uid, task)) = active.take() {
                task.abort();
                debug!(uid, "released previous message feed");
            }

            if let Some(user) = user {
                let mut feed = store.subscribe(&user.uid);
                let tx = tx.clone();
                let uid = user.uid.clone();
                debug!(uid, "message feed attached");
                let forward_uid = uid.clone();
                let task = tokio::spawn(async move {
                    while let Some(messages) = feed.recv().await {
                        let snapshot = UserSnapshot {
                            uid: forward_uid.clone(),
                            messages,
                        };
                        if tx.send(snapshot).await.is_err() {
                            break;
                        }
                    }
                });
                active = Some((uid, task));
            }

            if auth_rx.changed().await.is_err() {
                if let Some((_, task)) = active.take() {
                    task.abort();
                }
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatternest_auth::AuthService;
    use chatternest_core::MessageDraft;
    use chatternest_test_utils::TestStore;
    use std::time::Duration;

    async fn next_snapshot(rx: &mut mpsc::Receiver<UserSnapshot>) -> UserSnapshot {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("snapshot in time")
            .expect("switcher alive")
    }

    #[tokio::test]
    async fn sign_in_attaches_a_feed_for_that_user() {
        let harness = TestStore::open().await;
        let auth = AuthService::new(harness.store.database().unwrap());
        let (tx, mut rx) = mpsc::channel(16);
        let switcher = spawn_feed_switcher(harness.store.clone(), auth.subscribe(), tx);

        let user = auth.sign_up("alice@example.com", "secret1").await.unwrap();
        harness
            .store
            .save(&MessageDraft::user("hello"), &user.uid)
            .await
            .unwrap();

        // Drain until the saved message shows up; every snapshot must be
        // tagged with the signed-in user.
        loop {
            let snapshot = next_snapshot(&mut rx).await;
            assert_eq!(snapshot.uid, user.uid);
            if snapshot.messages.iter().any(|m| m.text == "hello") {
                break;
            }
        }

        switcher.abort();
    }

    #[tokio::test]
    async fn switching_users_releases_the_previous_feed() {
        let harness = TestStore::open().await;
        let auth = AuthService::new(harness.store.database().unwrap());
        let (tx, mut rx) = mpsc::channel(16);
        let switcher = spawn_feed_switcher(harness.store.clone(), auth.subscribe(), tx);

        let first = auth.sign_up("alice@example.com", "secret1").await.unwrap();
        harness
            .store
            .save(&MessageDraft::user("from alice"), &first.uid)
            .await
            .unwrap();

        let second = auth.sign_up("bob@example.com", "secret1").await.unwrap();

        // Drain until the switch is visible. Snapshot order follows send
        // order, so once a second-user snapshot arrives the first feed is
        // already released.
        loop {
            let snapshot = next_snapshot(&mut rx).await;
            if snapshot.uid == second.uid {
                break;
            }
            assert_eq!(snapshot.uid, first.uid);
        }

        // A post-switch write to the first user's history must never surface.
        harness
            .store
            .save(&MessageDraft::user("alice again"), &first.uid)
            .await
            .unwrap();

        let snapshot = next_snapshot(&mut rx).await;
        assert_eq!(snapshot.uid, second.uid);
        assert!(snapshot.messages.iter().all(|m| m.user_id != first.uid));

        switcher.abort();
    }

    #[tokio::test]
    async fn sign_out_detaches_the_feed() {
        let harness = TestStore::open().await;
        let auth = AuthService::new(harness.store.database().unwrap());
        let (tx, mut rx) = mpsc::channel(16);
        let switcher = spawn_feed_switcher(harness.store.clone(), auth.subscribe(), tx);

        let user = auth.sign_up("alice@example.com", "secret1").await.unwrap();
        let _ = next_snapshot(&mut rx).await;

        auth.log_out();
        // Give the switcher a beat to process the transition.
        tokio::time::sleep(Duration::from_millis(50)).await;
        while rx.try_recv().is_ok() {}

        harness
            .store
            .save(&MessageDraft::user("after sign-out"), &user.uid)
            .await
            .unwrap();

        let result = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
        assert!(result.is_err(), "no snapshot may arrive after sign-out");

        switcher.abort();
    }
}
