// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common domain types used across adapter traits and the ChatterNest core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Reserved owner id for assistant-originated messages.
///
/// Messages the assistant sends to a user are stored under the user's own
/// `user_id`, but the live feed also matches this sentinel so that globally
/// addressed assistant records are delivered too.
pub const ASSISTANT_USER_ID: &str = "ChatterNestAI";

/// Reserved owner id for system-originated messages.
pub const SYSTEM_USER_ID: &str = "system";

/// Who authored a message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
    System,
}

/// A persisted chat message.
///
/// Immutable after insert; the only destruction path is a bulk
/// delete of one user's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Store-assigned uuid, or a `temp-{millis}` tag for optimistic entries
    /// that have not been confirmed yet.
    pub id: String,
    /// Owning user, or one of the reserved sentinel ids.
    pub user_id: String,
    pub sender: Sender,
    pub text: String,
    /// RFC 3339 timestamp with millisecond precision, assigned by the store
    /// at insert time.
    pub created_at: String,
}

impl Message {
    /// Parses `created_at`, falling back to the current wall clock when the
    /// stored value is missing or unparseable.
    pub fn created_at_time(&self) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }
}

/// The unsaved half of a message: the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub sender: Sender,
    pub text: String,
}

impl MessageDraft {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Ai,
            text: text.into(),
        }
    }
}

/// Role tag on a conversation turn submitted to the completion API.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged turn in a conversation window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A signed-in account as seen by the rest of the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
}

/// A per-user profile document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub created_at: String,
}

/// Merge-patch for a profile document: only supplied fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    /// `Some(None)` clears the photo; `None` leaves it untouched.
    pub photo_url: Option<Option<String>>,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
    Auth,
}
