// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompt resolution from configuration.

use chatternest_config::model::AgentConfig;
use tracing::{info, warn};

/// Loads the system prompt following config priority: file > inline > default.
///
/// # Priority
/// 1. `config.system_prompt_file` -- reads from disk
/// 2. `config.system_prompt` -- inline string
/// 3. Default: "You are {name}, a helpful and friendly chatbot."
pub async fn load_system_prompt(config: &AgentConfig) -> String {
    // Priority 1: file path
    if let Some(ref file_path) = config.system_prompt_file {
        match tokio::fs::read_to_string(file_path).await {
            Ok(content) => {
                let trimmed = content.trim().to_string();
                if !trimmed.is_empty() {
                    info!(path = file_path.as_str(), "loaded system prompt from file");
                    return trimmed;
                }
            }
            Err(e) => {
                warn!(
                    path = file_path.as_str(),
                    error = %e,
                    "failed to read system prompt file, falling back"
                );
            }
        }
    }

    // Priority 2: inline string
    if let Some(ref prompt) = config.system_prompt {
        if !prompt.is_empty() {
            return prompt.clone();
        }
    }

    // Priority 3: default persona
    format!("You are {}, a helpful and friendly chatbot.", config.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_persona_uses_agent_name() {
        let config = AgentConfig::default();
        let prompt = load_system_prompt(&config).await;
        assert_eq!(
            prompt,
            "You are ChatterNest AI, a helpful and friendly chatbot."
        );
    }

    #[tokio::test]
    async fn inline_prompt_overrides_default() {
        let config = AgentConfig {
            system_prompt: Some("Custom inline prompt.".to_string()),
            ..Default::default()
        };
        assert_eq!(load_system_prompt(&config).await, "Custom inline prompt.");
    }

    #[tokio::test]
    async fn file_prompt_overrides_inline() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("prompt.md");
        std::fs::write(&file_path, "File-based prompt.\n").unwrap();

        let config = AgentConfig {
            system_prompt: Some("Inline prompt.".to_string()),
            system_prompt_file: Some(file_path.to_string_lossy().into_owned()),
            ..Default::default()
        };
        assert_eq!(load_system_prompt(&config).await, "File-based prompt.");
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_inline() {
        let config = AgentConfig {
            system_prompt: Some("Fallback prompt.".to_string()),
            system_prompt_file: Some("/nonexistent/path/prompt.md".to_string()),
            ..Default::default()
        };
        assert_eq!(load_system_prompt(&config).await, "Fallback prompt.");
    }
}
