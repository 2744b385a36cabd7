// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user chat session: optimistic local history plus the send pipeline.
//!
//! The session holds the latest live-feed snapshot in memory. Sending a
//! message appends an optimistic entry immediately, persists the user
//! message fire-and-forget, derives the conversation window from the history
//! held *before* the append, and routes the completion result either back
//! into storage (assistant reply) or to the caller (error label).
//!
//! Reconciliation of optimistic entries is implicit: the next snapshot from
//! the live feed replaces the held history wholesale. A write that silently
//! fails leaves its optimistic entry orphaned until then; there is no
//! correlation-id tracking.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::{error, warn};

use chatternest_context::conversation_window;
use chatternest_core::types::{Message, MessageDraft, Sender};
use chatternest_core::{is_error_label, CompletionProvider};
use chatternest_store::ChatStore;

/// Result of one send: the assistant's reply text, or the error label to
/// surface to the user. Nothing is persisted on the failure path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Replied(String),
    Failed(String),
}

/// One signed-in user's chat session.
pub struct ChatSession {
    user_id: String,
    store: Arc<ChatStore>,
    provider: Arc<dyn CompletionProvider>,
    history: Vec<Message>,
    window_size: usize,
}

impl ChatSession {
    pub fn new(
        user_id: impl Into<String>,
        store: Arc<ChatStore>,
        provider: Arc<dyn CompletionProvider>,
        window_size: usize,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            store,
            provider,
            history: Vec::new(),
            window_size,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The currently held history: the latest snapshot plus any optimistic
    /// entries appended since.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Replaces the held history with a live-feed snapshot, superseding any
    /// optimistic entries.
    pub fn apply_snapshot(&mut self, messages: Vec<Message>) {
        self.history = messages;
    }

    /// Sends a user message through the full pipeline.
    pub async fn send(&mut self, text: &str) -> SendOutcome {
        // The window is derived from the history held before this message;
        // the outgoing text travels separately as the final turn.
        let window = conversation_window(&self.history, self.window_size);

        self.history.push(optimistic_message(&self.user_id, text));
        spawn_save(
            self.store.clone(),
            MessageDraft::user(text),
            self.user_id.clone(),
        );

        let reply = self.provider.complete(text, &window).await;
        if is_error_label(&reply) {
            error!(user_id = %self.user_id, label = %reply, "completion failed");
            return SendOutcome::Failed(reply);
        }

        spawn_save(
            self.store.clone(),
            MessageDraft::ai(reply.clone()),
            self.user_id.clone(),
        );
        SendOutcome::Replied(reply)
    }
}

/// Builds the locally synthesized message shown before server confirmation.
/// The `temp-` id keeps it clearly distinguishable from confirmed records.
fn optimistic_message(user_id: &str, text: &str) -> Message {
    Message {
        id: format!("temp-{}", Utc::now().timestamp_millis()),
        user_id: user_id.to_string(),
        sender: Sender::User,
        text: text.to_string(),
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// Persists a draft without blocking the send pipeline. Failures are
/// reported in the log, never raised.
fn spawn_save(store: Arc<ChatStore>, draft: MessageDraft, user_id: String) {
    tokio::spawn(async move {
        if let Err(e) = store.save(&draft, &user_id).await {
            warn!(user_id = %user_id, error = %e, "fire-and-forget save failed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatternest_core::types::Role;
    use chatternest_test_utils::{MockProvider, TestStore};

    async fn snapshot_with_len(
        store: &ChatStore,
        user_id: &str,
        len: usize,
    ) -> Vec<Message> {
        let mut feed = store.subscribe(user_id);
        loop {
            let snapshot = feed.recv().await.expect("feed alive");
            if snapshot.len() >= len {
                return snapshot;
            }
        }
    }

    #[tokio::test]
    async fn send_persists_user_message_and_reply() {
        let harness = TestStore::open().await;
        let provider = Arc::new(MockProvider::with_responses(vec!["2+2 is 4.".to_string()]));
        let mut session = ChatSession::new("u1", harness.store.clone(), provider, 8);

        let outcome = session.send("What is 2+2?").await;
        assert_eq!(outcome, SendOutcome::Replied("2+2 is 4.".to_string()));

        let snapshot = snapshot_with_len(&harness.store, "u1", 2).await;
        assert_eq!(snapshot.len(), 2);
        let senders: Vec<Sender> = snapshot.iter().map(|m| m.sender).collect();
        assert!(senders.contains(&Sender::User));
        assert!(senders.contains(&Sender::Ai));
    }

    #[tokio::test]
    async fn error_label_is_surfaced_and_not_persisted() {
        let harness = TestStore::open().await;
        let provider = Arc::new(MockProvider::with_responses(vec![
            "API Error (500): upstream down".to_string(),
        ]));
        let mut session = ChatSession::new("u1", harness.store.clone(), provider, 8);

        let outcome = session.send("hello?").await;
        assert_eq!(
            outcome,
            SendOutcome::Failed("API Error (500): upstream down".to_string())
        );

        // Only the user message lands; the label is never written back.
        let snapshot = snapshot_with_len(&harness.store, "u1", 1).await;
        assert!(snapshot.iter().all(|m| m.sender == Sender::User));

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let snapshot = snapshot_with_len(&harness.store, "u1", 1).await;
        assert_eq!(snapshot.len(), 1);
    }

    #[tokio::test]
    async fn window_excludes_the_in_flight_message() {
        let harness = TestStore::open().await;
        let provider = Arc::new(MockProvider::new());
        let mut session =
            ChatSession::new("u1", harness.store.clone(), provider.clone(), 8);

        session.send("first question").await;
        let call = provider.last_call().await.unwrap();
        assert_eq!(call.new_message, "first question");
        assert!(call.prior_turns.is_empty());
    }

    #[tokio::test]
    async fn window_is_derived_from_the_applied_snapshot() {
        let harness = TestStore::open().await;
        let provider = Arc::new(MockProvider::new());
        let mut session =
            ChatSession::new("u1", harness.store.clone(), provider.clone(), 8);

        harness
            .store
            .save(&MessageDraft::user("earlier question"), "u1")
            .await
            .unwrap();
        harness
            .store
            .save(&MessageDraft::ai("earlier answer"), "u1")
            .await
            .unwrap();
        let snapshot = snapshot_with_len(&harness.store, "u1", 2).await;
        session.apply_snapshot(snapshot);

        session.send("follow-up").await;
        let call = provider.last_call().await.unwrap();
        assert_eq!(call.prior_turns.len(), 2);
        assert_eq!(call.prior_turns[0].role, Role::User);
        assert_eq!(call.prior_turns[0].content, "earlier question");
        assert_eq!(call.prior_turns[1].role, Role::Assistant);
        assert_eq!(call.prior_turns[1].content, "earlier answer");
    }

    #[tokio::test]
    async fn optimistic_entry_appears_immediately_and_is_superseded() {
        let harness = TestStore::open().await;
        let provider = Arc::new(MockProvider::new());
        let mut session = ChatSession::new("u1", harness.store.clone(), provider, 8);

        session.send("hello").await;
        assert!(session
            .history()
            .iter()
            .any(|m| m.id.starts_with("temp-") && m.text == "hello"));

        let snapshot = snapshot_with_len(&harness.store, "u1", 1).await;
        session.apply_snapshot(snapshot);
        assert!(session.history().iter().all(|m| !m.id.starts_with("temp-")));
        assert!(session.history().iter().any(|m| m.text == "hello"));
    }
}
