// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master password acquisition via TTY prompt or TINYVAULT_MASTER_PASSWORD.

use secrecy::SecretString;
use tinyvault_core::VaultError;

/// The environment variable name for providing the master password.
pub const MASTER_PASSWORD_ENV_VAR: &str = "TINYVAULT_MASTER_PASSWORD";

fn from_env() -> Option<SecretString> {
    match std::env::var(MASTER_PASSWORD_ENV_VAR) {
        Ok(value) if !value.is_empty() => Some(SecretString::from(value)),
        _ => None,
    }
}

fn read_hidden(label: &str) -> Result<String, VaultError> {
    eprint!("{label}: ");
    rpassword::read_password()
        .map_err(|e| VaultError::Internal(format!("failed to read password: {e}")))
}

fn no_source() -> VaultError {
    VaultError::InvalidInput(format!(
        "no master password provided. Set {MASTER_PASSWORD_ENV_VAR} or run interactively."
    ))
}

/// Get the master password from the environment or an interactive prompt.
///
/// Priority:
/// 1. `TINYVAULT_MASTER_PASSWORD` (for scripts and headless use)
/// 2. Interactive TTY prompt via `rpassword`
pub fn get_master_password() -> Result<SecretString, VaultError> {
    if let Some(password) = from_env() {
        return Ok(password);
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        let password = read_hidden("Master password")?;
        if password.is_empty() {
            return Err(VaultError::InvalidInput(
                "empty master password not allowed".to_string(),
            ));
        }
        return Ok(SecretString::from(password));
    }

    Err(no_source())
}

/// Get a new master password, prompting twice (for vault creation).
///
/// The environment variable is taken as-is without confirmation.
pub fn get_master_password_with_confirm() -> Result<SecretString, VaultError> {
    if let Some(password) = from_env() {
        return Ok(password);
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        let first = read_hidden("New master password")?;
        let second = read_hidden("Confirm master password")?;
        if first != second {
            return Err(VaultError::InvalidInput(
                "master passwords do not match".to_string(),
            ));
        }
        if first.trim().is_empty() {
            return Err(VaultError::InvalidInput(
                "empty master password not allowed".to_string(),
            ));
        }
        return Ok(SecretString::from(first));
    }

    Err(no_source())
}

/// Prompt for a record password without echo. Used by `add` when no
/// password is generated.
pub fn read_record_password() -> Result<SecretString, VaultError> {
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        let mut line = String::new();
        std::io::stdin()
            .read_line(&mut line)
            .map_err(|e| VaultError::Internal(format!("failed to read password: {e}")))?;
        return Ok(SecretString::from(line.trim_end_matches(['\r', '\n']).to_string()));
    }
    read_hidden("Password").map(SecretString::from)
}
