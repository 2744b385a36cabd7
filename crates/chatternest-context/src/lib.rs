// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation window assembly for ChatterNest.
//!
//! Derives the bounded, filtered, role-tagged turn sequence submitted to the
//! completion backend from the live history, and resolves the assistant's
//! system prompt from configuration. The window is recomputed on every send;
//! it has no lifecycle of its own.

pub mod prompt;
pub mod window;

pub use prompt::load_system_prompt;
pub use window::{conversation_window, DEFAULT_WINDOW_SIZE};
