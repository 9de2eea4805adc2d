// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TinyVault - a local, encrypted credential vault.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;
mod lookup;
mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tinyvault_config::model::TinyVaultConfig;
use tinyvault_config::ConfigError;
use tinyvault_core::VaultError;

/// TinyVault - a local, encrypted credential vault.
#[derive(Parser, Debug)]
#[command(name = "tinyvault", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the default search path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new vault by setting the master password.
    Init,
    /// Show vault state and storage location.
    Status,
    /// Add a record. Prompts for the password unless --generate is given.
    Add {
        /// Site the credential belongs to.
        site: String,
        /// Account name for the site.
        #[arg(long, short)]
        username: Option<String>,
        /// Generate a random password instead of prompting.
        #[arg(long)]
        generate: bool,
    },
    /// List all records.
    List {
        /// Print passwords in clear text.
        #[arg(long)]
        reveal: bool,
    },
    /// Find the first record matching a host name.
    Find {
        host: String,
        /// Print the password in clear text.
        #[arg(long)]
        reveal: bool,
    },
    /// Print a random password.
    Generate {
        #[arg(long, short)]
        length: Option<usize>,
        #[arg(long)]
        no_upper: bool,
        #[arg(long)]
        no_digits: bool,
        #[arg(long)]
        no_symbols: bool,
    },
    /// Launch an interactive shell with idle auto-lock.
    Shell,
}

fn load_config(path: Option<&std::path::Path>) -> Result<TinyVaultConfig, Vec<ConfigError>> {
    match path {
        Some(path) => tinyvault_config::load_and_validate_path(path),
        None => tinyvault_config::load_and_validate(),
    }
}

/// Install the fmt subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tinyvault={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

async fn run(command: Commands, config: TinyVaultConfig) -> Result<(), VaultError> {
    match command {
        Commands::Init => commands::run_init(&config).await,
        Commands::Status => commands::run_status(&config).await,
        Commands::Add {
            site,
            username,
            generate,
        } => commands::run_add(&config, &site, username.as_deref(), generate).await,
        Commands::List { reveal } => commands::run_list(&config, reveal).await,
        Commands::Find { host, reveal } => commands::run_find(&config, &host, reveal).await,
        Commands::Generate {
            length,
            no_upper,
            no_digits,
            no_symbols,
        } => {
            let settings = commands::generator_settings(
                &config.generator,
                length,
                no_upper,
                no_digits,
                no_symbols,
            );
            commands::run_generate(&settings)
        }
        Commands::Shell => shell::run_shell(config).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            tinyvault_config::render_errors(&errors);
            std::process::exit(2);
        }
    };
    init_tracing(&config.logging.level);

    let Some(command) = cli.command else {
        println!("tinyvault: use --help for available commands");
        return;
    };

    if let Err(e) = run(command, config).await {
        match &e {
            VaultError::NotInitialized => {
                eprintln!("{}: {e} (run `tinyvault init`)", "error".red());
            }
            _ => eprintln!("{}: {e}", "error".red()),
        }
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_with_flags() {
        let cli = Cli::try_parse_from([
            "tinyvault",
            "add",
            "example.com",
            "--username",
            "alice",
            "--generate",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add {
                site,
                username,
                generate,
            }) => {
                assert_eq!(site, "example.com");
                assert_eq!(username.as_deref(), Some("alice"));
                assert!(generate);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_generate_switches() {
        let cli = Cli::try_parse_from(["tinyvault", "generate", "-l", "24", "--no-symbols"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Generate {
                length: Some(24),
                no_upper: false,
                no_digits: false,
                no_symbols: true,
            })
        ));
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = load_config(None).expect("default config should be valid");
        assert_eq!(config.generator.length, 16);
    }
}
