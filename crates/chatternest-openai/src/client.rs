// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI chat completions endpoint.
//!
//! Handles request construction, bearer authentication, and classification
//! of every failure path into a [`CompletionFailure`]. No retries are
//! performed at this layer, and no timeout is layered on top of the
//! transport default.

use chatternest_core::ChatterNestError;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, error};

use crate::types::{ApiErrorResponse, ApiMessage, ChatRequest, ChatResponse};

/// How a completion request failed. The provider maps each variant to its
/// user-facing error label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionFailure {
    /// Non-success HTTP outcome with the upstream-provided message (or the
    /// transport status text when the upstream gives none).
    Api { status: u16, message: String },
    /// Success outcome whose body had no usable completion text.
    Malformed,
    /// Network unreachable, timeout, DNS, or a dropped connection.
    Transport(String),
}

/// HTTP client for OpenAI chat completion requests.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_url: String,
    model: String,
}

impl OpenAiClient {
    /// Creates a new client authenticated with the given bearer credential.
    pub fn new(api_key: &str, model: String, api_url: String) -> Result<Self, ChatterNestError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
            ChatterNestError::Config(format!("invalid API key header value: {e}"))
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("authorization", auth);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ChatterNestError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_url,
            model,
        })
    }

    /// Returns the model identifier sent with every request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends the full turn sequence and returns the trimmed text of the
    /// first completion choice.
    pub async fn send_chat(&self, messages: Vec<ApiMessage>) -> Result<String, CompletionFailure> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
        };

        let response = self
            .client
            .post(&self.api_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "completion request failed at the transport layer");
                CompletionFailure::Transport(e.to_string())
            })?;

        let status = response.status();
        debug!(status = %status, "completion response received");

        let body = response
            .text()
            .await
            .map_err(|e| CompletionFailure::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .ok()
                .map(|r| r.error.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown API Error")
                        .to_string()
                });
            error!(status = %status, message = %message, "completion API returned an error");
            return Err(CompletionFailure::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|_| CompletionFailure::Malformed)?;

        parsed
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .ok_or(CompletionFailure::Malformed)
    }
}
