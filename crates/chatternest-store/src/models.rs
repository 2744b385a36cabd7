// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `chatternest-core::types` for use
//! across adapter trait boundaries. This module re-exports them for
//! convenience within the storage crate.

pub use chatternest_core::types::{
    AuthUser, Message, MessageDraft, ProfileUpdate, Sender, UserProfile,
};
