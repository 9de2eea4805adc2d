// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot subcommands: `init`, `status`, `add`, `list`, `find`, `generate`.

use std::sync::Arc;

use colored::Colorize;
use secrecy::{ExposeSecret, SecretString};
use tinyvault_config::model::{GeneratorConfig, TinyVaultConfig};
use tinyvault_core::{
    DecryptedRecord, RecordStore, RevealedPassword, StorageAdapter, VaultError, VaultStatus,
};
use tinyvault_storage::SqliteStorage;
use tinyvault_vault::{generate_password, prompt, VaultSession};

use crate::lookup;

/// Open the configured database and a session over it.
pub async fn open_vault(
    config: &TinyVaultConfig,
) -> Result<(Arc<VaultSession>, Arc<SqliteStorage>), VaultError> {
    let storage = Arc::new(SqliteStorage::open(config.storage.clone()).await?);
    let session = VaultSession::open(storage.clone(), storage.clone(), &config.vault).await?;
    Ok((Arc::new(session), storage))
}

/// Prompt for the master password and unlock.
pub async fn unlock_interactive(
    session: &VaultSession,
) -> Result<Vec<DecryptedRecord>, VaultError> {
    if session.status().await == VaultStatus::Uninitialized {
        return Err(VaultError::NotInitialized);
    }
    let master_password = prompt::get_master_password()?;
    session.unlock(&master_password).await
}

/// Shown in place of a password that is not revealed. Fixed width, so it
/// leaks neither characters nor length.
pub const PASSWORD_MASK: &str = "********";

/// One listing line: site, username, password (masked unless `reveal`).
pub fn format_record(record: &DecryptedRecord, reveal: bool) -> String {
    let password = match (&record.password, reveal) {
        (RevealedPassword::Unreadable, _) => RevealedPassword::UNREADABLE_MARKER.to_string(),
        (RevealedPassword::Plain(secret), true) => secret.expose_secret().to_string(),
        (RevealedPassword::Plain(_), false) => PASSWORD_MASK.to_string(),
    };
    let username = if record.username.is_empty() {
        "-"
    } else {
        record.username.as_str()
    };
    format!("{:<32} {:<24} {}", record.site, username, password)
}

pub fn print_listing(records: &[DecryptedRecord], reveal: bool) {
    if records.is_empty() {
        println!("{}", "no records".dimmed());
        return;
    }
    for record in records {
        let line = format_record(record, reveal);
        if record.password.is_readable() {
            println!("{line}");
        } else {
            println!("{}", line.red());
        }
    }
}

/// Apply command-line overrides to the configured generator settings.
pub fn generator_settings(
    base: &GeneratorConfig,
    length: Option<usize>,
    no_upper: bool,
    no_digits: bool,
    no_symbols: bool,
) -> GeneratorConfig {
    GeneratorConfig {
        length: length.unwrap_or(base.length),
        uppercase: base.uppercase && !no_upper,
        digits: base.digits && !no_digits,
        symbols: base.symbols && !no_symbols,
    }
}

/// Close `storage` whatever `result` holds. The command's own error wins
/// over a close error.
pub(crate) async fn close_after<T>(
    storage: &SqliteStorage,
    result: Result<T, VaultError>,
) -> Result<T, VaultError> {
    let closed = storage.close().await;
    let value = result?;
    closed?;
    Ok(value)
}

pub async fn run_init(config: &TinyVaultConfig) -> Result<(), VaultError> {
    let (session, storage) = open_vault(config).await?;
    let result = async {
        if session.status().await != VaultStatus::Uninitialized {
            return Err(VaultError::AlreadyInitialized);
        }
        let master_password = prompt::get_master_password_with_confirm()?;
        session.set_master_password(&master_password).await
    }
    .await;
    close_after(&storage, result).await?;

    println!(
        "{} vault created at {}",
        "ok".green().bold(),
        storage.database_path()
    );
    Ok(())
}

pub async fn run_status(config: &TinyVaultConfig) -> Result<(), VaultError> {
    let (session, storage) = open_vault(config).await?;
    let result = async {
        let records = storage.load_all().await?.len();
        let health = storage.health_check().await?;
        Ok::<_, VaultError>((records, health))
    }
    .await;
    let status = session.status().await;
    let (records, health) = close_after(&storage, result).await?;

    println!("{:<10} {}", "vault".bold(), status);
    println!("{:<10} {}", "database".bold(), storage.database_path());
    println!("{:<10} {}", "records".bold(), records);
    println!("{:<10} {:?}", "storage".bold(), health);
    Ok(())
}

pub async fn run_add(
    config: &TinyVaultConfig,
    site: &str,
    username: Option<&str>,
    generate: bool,
) -> Result<(), VaultError> {
    let (session, storage) = open_vault(config).await?;
    let result = async {
        unlock_interactive(&session).await?;
        let password: SecretString = if generate {
            generate_password(&config.generator)?
        } else {
            prompt::read_record_password()?
        };
        let listing = session
            .add_record(site, username.unwrap_or_default(), password.expose_secret())
            .await?;
        Ok::<_, VaultError>((password, listing.len()))
    }
    .await;
    session.lock().await;
    let (password, count) = close_after(&storage, result).await?;

    println!("{} added {} ({} records)", "ok".green().bold(), site.trim(), count);
    if generate {
        println!("generated password: {}", password.expose_secret());
    }
    Ok(())
}

pub async fn run_list(config: &TinyVaultConfig, reveal: bool) -> Result<(), VaultError> {
    let (session, storage) = open_vault(config).await?;
    let result = unlock_interactive(&session).await;
    session.lock().await;
    let listing = close_after(&storage, result).await?;

    print_listing(&listing, reveal);
    Ok(())
}

pub async fn run_find(config: &TinyVaultConfig, host: &str, reveal: bool) -> Result<(), VaultError> {
    let (session, storage) = open_vault(config).await?;
    let result = unlock_interactive(&session).await;
    session.lock().await;
    let listing = close_after(&storage, result).await?;

    match lookup::find_for_host(&listing, host) {
        Some(record) => println!("{}", format_record(record, reveal)),
        None => println!("{} {}", "no record matches".yellow(), host),
    }
    Ok(())
}

pub fn run_generate(settings: &GeneratorConfig) -> Result<(), VaultError> {
    let password = generate_password(settings)?;
    println!("{}", password.expose_secret());
    Ok(())
}
