// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI completion provider for the ChatterNest chat client.
//!
//! Implements [`CompletionProvider`] over the chat completions endpoint.
//! Every failure path comes back as an error label string rather than an
//! error value, so the presentation layer has one uniform shape to route to
//! user-facing feedback (distinguished from response text via
//! [`chatternest_core::is_error_label`]).

pub mod client;
pub mod types;

use async_trait::async_trait;
use tracing::{error, info, warn};

use chatternest_config::ChatterNestConfig;
use chatternest_context::load_system_prompt;
use chatternest_core::types::{AdapterType, ChatTurn, HealthStatus, Role};
use chatternest_core::{ChatterNestError, CompletionProvider, PluginAdapter};

use crate::client::{CompletionFailure, OpenAiClient};
use crate::types::ApiMessage;

/// Label returned when no API credential is configured.
pub const MISSING_KEY_LABEL: &str =
    "Error: AI service is not configured correctly (Missing API Key).";

/// Label returned when the outgoing message is empty after trimming.
pub const INVALID_INPUT_LABEL: &str = "Error: Invalid input message provided.";

/// Label returned when a success response has no usable completion text.
pub const UNPARSEABLE_LABEL: &str =
    "Error: Could not parse response from AI (Invalid structure).";

/// OpenAI completion provider implementing [`CompletionProvider`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> absent.
/// A missing credential is a valid (degraded) state: the provider constructs
/// normally and every completion request returns the configuration label.
pub struct OpenAiProvider {
    client: Option<OpenAiClient>,
    system_prompt: String,
}

impl OpenAiProvider {
    /// Creates a new provider from the given configuration.
    pub async fn new(config: &ChatterNestConfig) -> Result<Self, ChatterNestError> {
        let system_prompt = load_system_prompt(&config.agent).await;

        let client = match resolve_api_key(&config.openai.api_key) {
            Some(key) => Some(OpenAiClient::new(
                &key,
                config.openai.model.clone(),
                config.openai.api_url.clone(),
            )?),
            None => {
                warn!("OpenAI API key missing; completion requests will return a configuration label");
                None
            }
        };

        info!(
            model = %config.openai.model,
            configured = client.is_some(),
            "OpenAI provider initialized"
        );

        Ok(Self {
            client,
            system_prompt,
        })
    }
}

/// Resolve the API key from config, falling back to the environment.
fn resolve_api_key(configured: &Option<String>) -> Option<String> {
    configured
        .clone()
        .filter(|k| !k.trim().is_empty())
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .filter(|k| !k.trim().is_empty())
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, ChatterNestError> {
        // No API call: health checks must not consume tokens.
        match self.client {
            Some(_) => Ok(HealthStatus::Healthy),
            None => Ok(HealthStatus::Degraded("missing API key".to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), ChatterNestError> {
        Ok(())
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, new_message: &str, prior_turns: &[ChatTurn]) -> String {
        let Some(client) = &self.client else {
            error!("completion requested without a configured API key");
            return MISSING_KEY_LABEL.to_string();
        };

        if new_message.trim().is_empty() {
            error!("completion requested with an empty message");
            return INVALID_INPUT_LABEL.to_string();
        }

        // Re-filter the history turns: submitting an entry with empty
        // content is a fatal request-shape error upstream, so the filter is
        // enforced here as well as in the window builder.
        let mut messages = Vec::with_capacity(prior_turns.len() + 2);
        messages.push(ApiMessage {
            role: Role::System,
            content: self.system_prompt.clone(),
        });
        messages.extend(
            prior_turns
                .iter()
                .filter(|turn| {
                    matches!(turn.role, Role::User | Role::Assistant)
                        && !turn.content.trim().is_empty()
                })
                .map(ApiMessage::from),
        );
        messages.push(ApiMessage {
            role: Role::User,
            content: new_message.to_string(),
        });

        match client.send_chat(messages).await {
            Ok(text) => text,
            Err(CompletionFailure::Api { status, message }) => {
                format!("API Error ({status}): {message}")
            }
            Err(CompletionFailure::Malformed) => UNPARSEABLE_LABEL.to_string(),
            Err(CompletionFailure::Transport(detail)) => {
                format!("Error: Failed to reach AI service: {detail}")
            }
        }
    }
}
