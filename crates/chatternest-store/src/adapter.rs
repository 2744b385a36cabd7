// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the message store adapter.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use chatternest_config::model::StorageConfig;
use chatternest_core::types::{AuthUser, ProfileUpdate, UserProfile};
use chatternest_core::{
    AdapterType, ChatterNestError, HealthStatus, MessageDraft, PluginAdapter, StorageAdapter,
};

use crate::database::Database;
use crate::feed::MessageFeed;
use crate::queries;

/// SQLite-backed message store.
///
/// Wraps a [`Database`] handle and delegates query operations to the typed
/// query modules. The database is lazily opened on the first call to
/// [`StorageAdapter::initialize`]; until then every operation reports the
/// store as unavailable instead of panicking on a missing handle.
pub struct ChatStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl ChatStore {
    /// Create a new ChatStore with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, ChatterNestError> {
        self.db.get().ok_or_else(|| ChatterNestError::Storage {
            source: "store not initialized -- call initialize() first".into(),
        })
    }

    /// Returns the shared database handle for collaborators (the auth
    /// service keeps its account table in the same file).
    pub fn database(&self) -> Result<Database, ChatterNestError> {
        self.db().cloned()
    }

    /// Appends a new message record with a store-assigned id and creation
    /// time, then wakes every live feed. Never overwrites.
    ///
    /// Callers that do not want to block on confirmation spawn this future
    /// and log the failure (fire-and-forget).
    pub async fn save(
        &self,
        draft: &MessageDraft,
        user_id: &str,
    ) -> Result<String, ChatterNestError> {
        let db = self.db()?;
        let message = queries::messages::insert_message(db, draft, user_id).await?;
        db.notify_changed();
        debug!(user_id, id = %message.id, sender = %message.sender, "message saved");
        Ok(message.id)
    }

    /// Establishes a live feed of the most recent history window for
    /// `user_id` (their own messages plus sentinel-owned ones).
    ///
    /// A missing user or an uninitialized store yields a feed that delivers
    /// one empty snapshot and ends, mirroring how delivery failures inside a
    /// running feed downgrade to an empty list.
    pub fn subscribe(&self, user_id: &str) -> MessageFeed {
        if user_id.is_empty() {
            return MessageFeed::empty();
        }
        match self.db() {
            Ok(db) => MessageFeed::spawn(db.clone(), user_id.to_string()),
            Err(e) => {
                error!(error = %e, "subscribe requested before store initialization");
                MessageFeed::empty()
            }
        }
    }

    /// Removes every message owned by `user_id` as a single atomic batch.
    ///
    /// Returns `true` on success, including when no messages matched;
    /// `false` when the query or the commit fails. Failures are logged, not
    /// raised: callers route the boolean straight to user-facing feedback.
    pub async fn delete_all(&self, user_id: &str) -> bool {
        if user_id.is_empty() {
            error!("delete_all called without a user id");
            return false;
        }
        let db = match self.db() {
            Ok(db) => db,
            Err(e) => {
                error!(error = %e, "delete_all requested before store initialization");
                return false;
            }
        };
        match queries::messages::delete_for_user(db, user_id).await {
            Ok(0) => {
                info!(user_id, "no chat history to delete");
                true
            }
            Ok(deleted) => {
                info!(user_id, deleted, "chat history deleted");
                db.notify_changed();
                true
            }
            Err(e) => {
                error!(user_id, error = %e, "failed to delete chat history");
                false
            }
        }
    }

    // --- Profile documents ---

    /// Creates the user's profile document if it does not already exist.
    pub async fn ensure_profile(
        &self,
        user: &AuthUser,
        display_name: Option<&str>,
    ) -> Result<(), ChatterNestError> {
        queries::profiles::insert_profile_if_absent(self.db()?, &user.uid, &user.email, display_name)
            .await
    }

    /// Retrieves a user's profile document.
    pub async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, ChatterNestError> {
        queries::profiles::get_profile(self.db()?, uid).await
    }

    /// Applies a merge-patch to a user's profile document.
    pub async fn update_profile(
        &self,
        uid: &str,
        update: &ProfileUpdate,
    ) -> Result<(), ChatterNestError> {
        queries::profiles::update_profile(self.db()?, uid, update).await
    }
}

#[async_trait]
impl PluginAdapter for ChatStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, ChatterNestError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ChatterNestError> {
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for ChatStore {
    async fn initialize(&self) -> Result<(), ChatterNestError> {
        let db = Database::open(&self.config.database_path).await?;
        self.db.set(db).map_err(|_| ChatterNestError::Storage {
            source: "store already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), ChatterNestError> {
        self.db()?.close().await
    }
}
