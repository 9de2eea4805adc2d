// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the TinyVault credential vault.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level TinyVault configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TinyVaultConfig {
    /// Key derivation settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Unlocked-session settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Password generator defaults.
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Key derivation configuration.
///
/// Only consulted when a vault is created; unlock always uses the iteration
/// count stored with the master credential.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// PBKDF2-HMAC-SHA256 iteration count (default: 100000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: default_kdf_iterations(),
        }
    }
}

/// Lowest iteration count accepted by validation.
pub const MIN_KDF_ITERATIONS: u32 = 100_000;

fn default_kdf_iterations() -> u32 {
    MIN_KDF_ITERATIONS
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("tinyvault").join("tinyvault.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("tinyvault.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Unlocked-session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Idle seconds before an unlocked vault locks itself. `0` disables auto-lock.
    #[serde(default = "default_auto_lock_secs")]
    pub auto_lock_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auto_lock_secs: default_auto_lock_secs(),
        }
    }
}

fn default_auto_lock_secs() -> u64 {
    20
}

/// Password generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Number of characters in a generated password.
    #[serde(default = "default_generator_length")]
    pub length: usize,

    /// Include `A-Z`.
    #[serde(default = "default_true")]
    pub uppercase: bool,

    /// Include `0-9`.
    #[serde(default = "default_true")]
    pub digits: bool,

    /// Include punctuation symbols.
    #[serde(default = "default_true")]
    pub symbols: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            length: default_generator_length(),
            uppercase: true,
            digits: true,
            symbols: true,
        }
    }
}

fn default_generator_length() -> usize {
    16
}

fn default_true() -> bool {
    true
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = TinyVaultConfig::default();
        assert_eq!(config.vault.kdf_iterations, 100_000);
        assert!(config.storage.wal_mode);
        assert!(config.storage.database_path.ends_with("tinyvault.db"));
        assert_eq!(config.session.auto_lock_secs, 20);
        assert_eq!(config.generator, GeneratorConfig::default());
        assert_eq!(config.generator.length, 16);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_generator_section_keeps_other_defaults() {
        let config: TinyVaultConfig = toml::from_str("[generator]\nsymbols = false\n").unwrap();
        assert!(!config.generator.symbols);
        assert!(config.generator.uppercase);
        assert_eq!(config.generator.length, 16);
    }

    #[test]
    fn unknown_section_is_rejected() {
        assert!(toml::from_str::<TinyVaultConfig>("[sync]\nenabled = true\n").is_err());
    }
}
