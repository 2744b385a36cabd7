// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `chatternest shell` command implementation.
//!
//! Launches an interactive REPL with colored output and readline history.
//! The shell is the presentation layer: it signs users in and out, applies
//! live-feed snapshots, routes chat lines through the send pipeline, and
//! shows error labels as feedback instead of persisting them.

use std::sync::Arc;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::sync::mpsc;

use chatternest_agent::{spawn_feed_switcher, ChatSession, SendOutcome, UserSnapshot};
use chatternest_auth::AuthService;
use chatternest_config::ChatterNestConfig;
use chatternest_core::types::ProfileUpdate;
use chatternest_core::{ChatterNestError, CompletionProvider, StorageAdapter};
use chatternest_openai::OpenAiProvider;
use chatternest_store::ChatStore;

/// Runs the interactive chat shell.
pub async fn run_shell(config: ChatterNestConfig) -> Result<(), ChatterNestError> {
    // Initialize storage.
    let store = ChatStore::new(config.storage.clone());
    store.initialize().await.inspect_err(|e| {
        eprintln!("error: message store unavailable: {e}");
    })?;
    let store = Arc::new(store);

    // Initialize the completion provider. A missing API key degrades to
    // labelled errors at send time rather than blocking the shell.
    let provider: Arc<dyn CompletionProvider> = Arc::new(OpenAiProvider::new(&config).await?);

    // Auth shares the store's database.
    let auth = AuthService::new(store.database()?);

    // Live feed snapshots arrive tagged with the owning uid.
    let (snapshot_tx, mut snapshot_rx) = mpsc::channel::<UserSnapshot>(16);
    let switcher = spawn_feed_switcher(store.clone(), auth.subscribe(), snapshot_tx);

    let mut rl = DefaultEditor::new()
        .map_err(|e| ChatterNestError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "ChatterNest".bold().green());
    println!(
        "Type {} to get started, {} for commands, {} to exit.\n",
        "/login <email> <password>".yellow(),
        "/help".yellow(),
        "/quit".yellow()
    );

    let mut session: Option<ChatSession> = None;

    loop {
        // Apply any pending snapshots before prompting; snapshots for a
        // previous user context are discarded by the uid tag.
        while let Ok(snapshot) = snapshot_rx.try_recv() {
            if let Some(ref mut active) = session {
                if active.user_id() == snapshot.uid {
                    active.apply_snapshot(snapshot.messages);
                }
            }
        }

        let prompt = match session {
            Some(_) => format!("{}> ", "you".green()),
            None => format!("{}> ", "guest".dimmed()),
        };

        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }

                if let Some(command) = trimmed.strip_prefix('/') {
                    handle_command(
                        command,
                        &store,
                        &provider,
                        &auth,
                        config.context.window_size,
                        &mut session,
                    )
                    .await;
                    continue;
                }

                let Some(ref mut active) = session else {
                    println!("{}", "Please log in to chat (/login or /signup).".yellow());
                    continue;
                };

                match active.send(trimmed).await {
                    SendOutcome::Replied(text) => {
                        println!("{} {text}\n", "ai>".cyan().bold());
                    }
                    SendOutcome::Failed(label) => {
                        eprintln!("{} {label}\n", "ai error:".red().bold());
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                // Ctrl+C / Ctrl+D
                break;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    auth.log_out();
    switcher.abort();
    store.close().await?;

    println!("{}", "goodbye".dimmed());
    Ok(())
}

/// Dispatches one `/command` line.
async fn handle_command(
    command: &str,
    store: &Arc<ChatStore>,
    provider: &Arc<dyn CompletionProvider>,
    auth: &AuthService,
    window_size: usize,
    session: &mut Option<ChatSession>,
) {
    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();

    match name {
        "help" => {
            println!("  /signup <email> <password>   create an account and sign in");
            println!("  /login <email> <password>    sign in");
            println!("  /logout                      sign out");
            println!("  /profile                     show your profile");
            println!("  /name <display name>         update your display name");
            println!("  /clear                       delete your chat history");
            println!("  /quit                        exit");
        }
        "signup" | "login" => {
            let (Some(email), Some(password)) = (parts.next(), parts.next()) else {
                println!("usage: /{name} <email> <password>");
                return;
            };
            let result = if name == "signup" {
                auth.sign_up(email, password).await
            } else {
                auth.log_in(email, password).await
            };
            match result {
                Ok(user) => {
                    if let Err(e) = store.ensure_profile(&user, None).await {
                        eprintln!("{}: {e}", "profile error".red());
                    }
                    println!("{} {}\n", "signed in as".green(), user.email.bold());
                    *session = Some(ChatSession::new(
                        user.uid,
                        store.clone(),
                        provider.clone(),
                        window_size,
                    ));
                }
                Err(e) => eprintln!("{}: {e}", "auth error".red()),
            }
        }
        "logout" => {
            auth.log_out();
            *session = None;
            println!("{}", "signed out".dimmed());
        }
        "profile" => {
            let Some(active) = session.as_ref() else {
                println!("{}", "not signed in".yellow());
                return;
            };
            match store.get_profile(active.user_id()).await {
                Ok(Some(profile)) => {
                    println!("  name:  {}", profile.display_name);
                    println!("  email: {}", profile.email);
                    if let Some(photo) = profile.photo_url {
                        println!("  photo: {photo}");
                    }
                }
                Ok(None) => println!("{}", "no profile found".yellow()),
                Err(e) => eprintln!("{}: {e}", "profile error".red()),
            }
        }
        "name" => {
            let Some(active) = session.as_ref() else {
                println!("{}", "not signed in".yellow());
                return;
            };
            let display_name = parts.collect::<Vec<_>>().join(" ");
            if display_name.is_empty() {
                println!("usage: /name <display name>");
                return;
            }
            let update = ProfileUpdate {
                display_name: Some(display_name),
                photo_url: None,
            };
            match store.update_profile(active.user_id(), &update).await {
                Ok(()) => println!("{}", "profile updated".green()),
                Err(e) => eprintln!("{}: {e}", "profile error".red()),
            }
        }
        "clear" => {
            let Some(active) = session.as_mut() else {
                println!("{}", "not signed in".yellow());
                return;
            };
            if store.delete_all(active.user_id()).await {
                active.apply_snapshot(Vec::new());
                println!("{}", "chat history deleted".green());
            } else {
                eprintln!("{}", "failed to delete chat history".red());
            }
        }
        other => println!("unknown command: /{other} (try /help)"),
    }
}
