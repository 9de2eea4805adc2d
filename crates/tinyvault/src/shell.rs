// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tinyvault shell` command implementation.
//!
//! Interactive REPL with readline history over one vault session. The
//! session auto-locks after the configured idle period; every entered line
//! counts as activity.

use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use secrecy::ExposeSecret;
use tinyvault_config::model::TinyVaultConfig;
use tinyvault_core::{VaultError, VaultStatus};
use tinyvault_vault::{generate_password, prompt, AutoLock, VaultSession};
use tracing::debug;

use crate::commands::{self, format_record, print_listing};
use crate::lookup;

const HELP: &str = "\
commands:
  list [--reveal]                 show all records
  add <site> [username] [--generate]
  find <host> [--reveal]          first record matching a host
  generate [length]               print a random password
  lock | unlock | status
  help | quit";

/// A parsed REPL line.
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand {
    List { reveal: bool },
    Add {
        site: String,
        username: String,
        generate: bool,
    },
    Find { host: String, reveal: bool },
    Generate { length: Option<usize> },
    Lock,
    Unlock,
    Status,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Err("empty command".to_string());
    };
    let (flags, args): (Vec<&str>, Vec<&str>) = words.partition(|w| w.starts_with("--"));
    let has_flag = |name: &str| flags.iter().any(|f| *f == name);

    match command {
        "list" | "ls" => Ok(ShellCommand::List {
            reveal: has_flag("--reveal"),
        }),
        "add" => match args.as_slice() {
            [site] | [site, _] => Ok(ShellCommand::Add {
                site: site.to_string(),
                username: args.get(1).map(|u| u.to_string()).unwrap_or_default(),
                generate: has_flag("--generate"),
            }),
            _ => Err("usage: add <site> [username] [--generate]".to_string()),
        },
        "find" => match args.as_slice() {
            [host] => Ok(ShellCommand::Find {
                host: host.to_string(),
                reveal: has_flag("--reveal"),
            }),
            _ => Err("usage: find <host> [--reveal]".to_string()),
        },
        "generate" | "gen" => match args.as_slice() {
            [] => Ok(ShellCommand::Generate { length: None }),
            [n] => n
                .parse()
                .map(|length| ShellCommand::Generate {
                    length: Some(length),
                })
                .map_err(|_| format!("invalid length: {n}")),
            _ => Err("usage: generate [length]".to_string()),
        },
        "lock" => Ok(ShellCommand::Lock),
        "unlock" => Ok(ShellCommand::Unlock),
        "status" => Ok(ShellCommand::Status),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" | "/quit" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command: {other} (try `help`)")),
    }
}

/// Runs the `tinyvault shell` interactive REPL.
pub async fn run_shell(config: TinyVaultConfig) -> Result<(), VaultError> {
    let (session, storage) = commands::open_vault(&config).await?;
    let result = shell_loop(&session, &config).await;
    session.lock().await;
    debug!("shell exited");
    commands::close_after(&storage, result).await
}

async fn shell_loop(session: &Arc<VaultSession>, config: &TinyVaultConfig) -> Result<(), VaultError> {
    if session.status().await == VaultStatus::Uninitialized {
        return Err(VaultError::NotInitialized);
    }

    let mut rl = DefaultEditor::new()
        .map_err(|e| VaultError::Internal(format!("failed to initialize readline: {e}")))?;

    let autolock = AutoLock::spawn(
        session.clone(),
        Duration::from_secs(config.session.auto_lock_secs),
    );

    println!("{}", "tinyvault shell".bold().green());
    println!("Type {} for commands, {} to exit.\n", "help".yellow(), "quit".yellow());

    loop {
        let prompt_text = match session.status().await {
            VaultStatus::Unlocked => format!("{}> ", "tinyvault".green()),
            _ => format!("{}> ", "tinyvault (locked)".yellow()),
        };

        match rl.readline(&prompt_text) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);
                autolock.touch();

                let command = match parse_command(trimmed) {
                    Ok(command) => command,
                    Err(usage) => {
                        eprintln!("{usage}");
                        continue;
                    }
                };
                if command == ShellCommand::Quit {
                    break;
                }
                if let Err(e) = execute(session, config, command).await {
                    match &e {
                        VaultError::Locked => {
                            eprintln!("{} (type {})", "vault is locked".yellow(), "unlock".bold());
                        }
                        _ => eprintln!("{}: {e}", "error".red()),
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    autolock.shutdown().await;
    Ok(())
}

async fn execute(
    session: &VaultSession,
    config: &TinyVaultConfig,
    command: ShellCommand,
) -> Result<(), VaultError> {
    match command {
        ShellCommand::List { reveal } => {
            print_listing(&session.list_records().await?, reveal);
        }
        ShellCommand::Add {
            site,
            username,
            generate,
        } => {
            if session.status().await != VaultStatus::Unlocked {
                return Err(VaultError::Locked);
            }
            let password = if generate {
                generate_password(&config.generator)?
            } else {
                prompt::read_record_password()?
            };
            let listing = session
                .add_record(&site, &username, password.expose_secret())
                .await?;
            println!("{} added {} ({} records)", "ok".green(), site, listing.len());
            if generate {
                println!("generated password: {}", password.expose_secret());
            }
        }
        ShellCommand::Find { host, reveal } => {
            let listing = session.list_records().await?;
            match lookup::find_for_host(&listing, &host) {
                Some(record) => println!("{}", format_record(record, reveal)),
                None => println!("{} {}", "no record matches".yellow(), host),
            }
        }
        ShellCommand::Generate { length } => {
            let settings =
                commands::generator_settings(&config.generator, length, false, false, false);
            commands::run_generate(&settings)?;
        }
        ShellCommand::Lock => {
            if session.lock().await {
                println!("{}", "locked".yellow());
            } else {
                println!("already locked");
            }
        }
        ShellCommand::Unlock => {
            let listing = commands::unlock_interactive(session).await?;
            println!("{} {} records", "unlocked".green(), listing.len());
        }
        ShellCommand::Status => {
            println!("vault {}", session.status().await);
        }
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Quit => {}
    }
    Ok(())
}
