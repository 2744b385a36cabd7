// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat orchestration for the ChatterNest client.
//!
//! Ties the store, the conversation window builder, and the completion
//! provider together: [`ChatSession`] runs the send pipeline for one user,
//! and [`spawn_feed_switcher`] keeps exactly one live message feed attached
//! as users sign in, switch, and sign out.

pub mod lifecycle;
pub mod session;

pub use lifecycle::{spawn_feed_switcher, UserSnapshot};
pub use session::{ChatSession, SendOutcome};
