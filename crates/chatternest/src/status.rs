// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `chatternest status` command implementation.
//!
//! Opens the configured backends and reports their health: the message
//! store (including the database path) and the completion provider
//! (credential presence, never an API call).

use colored::Colorize;

use chatternest_auth::AuthService;
use chatternest_config::ChatterNestConfig;
use chatternest_core::{ChatterNestError, HealthStatus, PluginAdapter, StorageAdapter};
use chatternest_openai::OpenAiProvider;
use chatternest_store::ChatStore;

/// Run the `chatternest status` command.
pub async fn run_status(config: ChatterNestConfig) -> Result<(), ChatterNestError> {
    println!();
    println!("  chatternest status");
    println!("  {}", "-".repeat(35));
    println!("    Database: {}", config.storage.database_path);
    println!("    Model:    {}", config.openai.model);

    let store = ChatStore::new(config.storage.clone());
    match store.initialize().await {
        Ok(()) => {
            print_health("store", store.health_check().await);
            let auth = AuthService::new(store.database()?);
            print_health("auth", auth.health_check().await);
            store.close().await?;
        }
        Err(e) => {
            println!("    store:    {} {e}", "✗".red());
        }
    }

    let provider = OpenAiProvider::new(&config).await?;
    print_health("openai", provider.health_check().await);

    println!();
    Ok(())
}

/// Renders one adapter health line.
fn print_health(name: &str, health: Result<HealthStatus, ChatterNestError>) {
    match health {
        Ok(HealthStatus::Healthy) => {
            println!("    {name}:    {} healthy", "✓".green());
        }
        Ok(HealthStatus::Degraded(reason)) => {
            println!("    {name}:    {} degraded ({reason})", "!".yellow());
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            println!("    {name}:    {} unhealthy ({reason})", "✗".red());
        }
        Err(e) => {
            println!("    {name}:    {} {e}", "✗".red());
        }
    }
}
