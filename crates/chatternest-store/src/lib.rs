// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the ChatterNest chat client.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, typed query
//! operations for messages and profile documents, and the live message feed
//! that re-delivers the full history window on every change.

pub mod adapter;
pub mod database;
pub mod feed;
pub mod migrations;
pub mod models;
pub mod queries;

pub use adapter::ChatStore;
pub use database::Database;
pub use feed::{MessageFeed, RECENT_WINDOW};
pub use models::*;
