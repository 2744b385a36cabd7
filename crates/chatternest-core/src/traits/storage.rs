// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for persistence backends.

use async_trait::async_trait;

use crate::error::ChatterNestError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for storage and persistence backends.
///
/// Storage adapters manage the lifecycle of database connections and back
/// the message history and profile documents. `initialize` returning `Err`
/// is the explicit "unavailable" state: callers hold a constructed adapter
/// either way and decide how to degrade.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), ChatterNestError>;

    /// Closes the storage backend, flushing pending writes and releasing
    /// connections.
    async fn close(&self) -> Result<(), ChatterNestError>;
}
