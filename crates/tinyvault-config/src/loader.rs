// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tinyvault.toml` > `~/.config/tinyvault/tinyvault.toml`
//! > `/etc/tinyvault/tinyvault.toml` with environment variable overrides via the
//! `TINYVAULT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TinyVaultConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/tinyvault/tinyvault.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "tinyvault.toml";

/// Per-user config file under the XDG config directory.
pub fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("tinyvault").join(LOCAL_CONFIG_FILE))
        .unwrap_or_default()
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tinyvault/tinyvault.toml` (system-wide)
/// 3. `~/.config/tinyvault/tinyvault.toml` (user XDG config)
/// 4. `./tinyvault.toml` (local directory)
/// 5. `TINYVAULT_*` environment variables
pub fn load_config() -> Result<TinyVaultConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<TinyVaultConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TinyVaultConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TinyVaultConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TinyVaultConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TinyVaultConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `TINYVAULT_VAULT_KDF_ITERATIONS` must map to
/// `vault.kdf_iterations`, not `vault.kdf.iterations`.
/// `TINYVAULT_MASTER_PASSWORD` is read by the passphrase prompt, not here.
fn env_provider() -> Env {
    Env::prefixed("TINYVAULT_")
        .ignore(&["master_password"])
        .map(|key| {
            // `key` is the lowercased env var name with prefix stripped.
            // Example: TINYVAULT_SESSION_AUTO_LOCK_SECS -> "session_auto_lock_secs"
            let key_str = key.as_str();
            let mapped = key_str
                .replacen("vault_", "vault.", 1)
                .replacen("storage_", "storage.", 1)
                .replacen("session_", "session.", 1)
                .replacen("generator_", "generator.", 1)
                .replacen("logging_", "logging.", 1);
            mapped.into()
        })
}
