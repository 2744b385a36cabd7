// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and a
//! change-notification signal for live feeds.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use std::path::Path;

use chatternest_core::ChatterNestError;
use tokio::sync::broadcast;
use tracing::debug;

/// Capacity of the change-notification channel. Live feeds re-query the full
/// snapshot on every wakeup, so a lagged receiver loses nothing.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// A handle to the SQLite database shared by every store component.
///
/// Cloning is cheap: clones share the single background connection and the
/// change-notification channel.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
    changes: broadcast::Sender<()>,
}

impl Database {
    /// Opens (creating if necessary) the database at `path`, applies the
    /// connection PRAGMAs, and runs all pending migrations.
    pub async fn open(path: &str) -> Result<Self, ChatterNestError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ChatterNestError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| ChatterNestError::Storage {
                source: Box::new(e),
            })?;

        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| crate::migrations::run_migrations(conn))
            .await
            .map_err(|e: tokio_rusqlite::Error<refinery::Error>| ChatterNestError::Storage {
                source: Box::new(e),
            })?;

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);

        debug!(path, "database opened");
        Ok(Self { conn, changes })
    }

    /// Returns the underlying tokio-rusqlite connection handle.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Subscribes to the change-notification signal. One `()` is published
    /// after every committed write that affects message history.
    pub fn changes(&self) -> broadcast::Receiver<()> {
        self.changes.subscribe()
    }

    /// Publishes a change notification. A send error only means no live feed
    /// is currently attached, which is fine.
    pub fn notify_changed(&self) {
        let _ = self.changes.send(());
    }

    /// Checkpoints the WAL. Pending writes are flushed into the main
    /// database file; the connection stays usable.
    pub async fn close(&self) -> Result<(), ChatterNestError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Maps a tokio-rusqlite error into the shared storage error variant.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> ChatterNestError {
    ChatterNestError::Storage {
        source: Box::new(e),
    }
}
