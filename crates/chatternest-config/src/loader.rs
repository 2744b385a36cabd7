// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./chatternest.toml` > `~/.config/chatternest/chatternest.toml`
//! > `/etc/chatternest/chatternest.toml` with environment variable overrides
//! via `CHATTERNEST_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ChatterNestConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/chatternest/chatternest.toml` (system-wide)
/// 3. `~/.config/chatternest/chatternest.toml` (user XDG config)
/// 4. `./chatternest.toml` (local directory)
/// 5. `CHATTERNEST_*` environment variables
pub fn load_config() -> Result<ChatterNestConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ChatterNestConfig::default()))
        .merge(Toml::file("/etc/chatternest/chatternest.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("chatternest/chatternest.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("chatternest.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<ChatterNestConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ChatterNestConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ChatterNestConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ChatterNestConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `CHATTERNEST_OPENAI_API_KEY` must map to
/// `openai.api_key`, not `openai.api.key`.
fn env_provider() -> Env {
    Env::prefixed("CHATTERNEST_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: CHATTERNEST_OPENAI_API_KEY -> "openai_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("openai_", "openai.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("context_", "context.", 1);
        mapped.into()
    })
}
