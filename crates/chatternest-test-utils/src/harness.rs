// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness helpers: a ready-to-use store over a scratch database.

use std::sync::Arc;

use chatternest_config::model::StorageConfig;
use chatternest_core::StorageAdapter;
use chatternest_store::ChatStore;

/// An initialized [`ChatStore`] over a temporary database file.
///
/// The scratch directory lives as long as the harness; dropping it removes
/// the database.
pub struct TestStore {
    pub store: Arc<ChatStore>,
    _dir: tempfile::TempDir,
}

impl TestStore {
    /// Opens a fresh store in a scratch directory and runs migrations.
    pub async fn open() -> Self {
        let dir = tempfile::tempdir().expect("scratch dir");
        let db_path = dir.path().join("test.db");
        let store = ChatStore::new(StorageConfig {
            database_path: db_path.to_str().expect("utf-8 path").to_string(),
        });
        store.initialize().await.expect("store init");
        Self {
            store: Arc::new(store),
            _dir: dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatternest_core::MessageDraft;

    #[tokio::test]
    async fn harness_store_is_usable_immediately() {
        let harness = TestStore::open().await;
        let id = harness
            .store
            .save(&MessageDraft::user("hello"), "u1")
            .await
            .unwrap();
        assert!(!id.is_empty());
    }
}
