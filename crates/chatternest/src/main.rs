// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ChatterNest - a personal AI chat client.
//!
//! This is the binary entry point for the ChatterNest CLI.

mod shell;
mod status;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// ChatterNest - a personal AI chat client.
#[derive(Parser, Debug)]
#[command(name = "chatternest", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch the interactive chat shell (default).
    Shell,
    /// Show configuration and backend health.
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match chatternest_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            chatternest_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins; the configured level is the fallback.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.agent.log_level.clone())),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Some(Commands::Status) => status::run_status(config).await,
        Some(Commands::Shell) | None => shell::run_shell(config).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        super::Cli::command().debug_assert();
    }
}
