// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion provider trait for hosted language-model backends.

use async_trait::async_trait;

use crate::traits::adapter::PluginAdapter;
use crate::types::ChatTurn;

/// Marker prefixes that identify an error label returned by
/// [`CompletionProvider::complete`].
const ERROR_LABEL_PREFIXES: [&str; 2] = ["Error:", "API Error"];

/// Returns true when a completion result is an error label rather than
/// response text.
pub fn is_error_label(text: &str) -> bool {
    ERROR_LABEL_PREFIXES.iter().any(|p| text.starts_with(p))
}

/// Adapter for hosted completion backends.
///
/// `complete` never fails: every outcome is a string. A successful call
/// returns the trimmed response text; every failure path (missing
/// credential, invalid input, upstream error, transport error, unparseable
/// body) returns an error label recognizable via [`is_error_label`], so
/// callers have one uniform failure shape to route to user-facing feedback.
#[async_trait]
pub trait CompletionProvider: PluginAdapter {
    /// Submits `prior_turns` plus the new outgoing user message and returns
    /// either the response text or an error label.
    async fn complete(&self, new_message: &str, prior_turns: &[ChatTurn]) -> String;
}
