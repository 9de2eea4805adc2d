// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes.
//! All errors are collected; validation does not stop at the first failure.

use crate::diagnostic::ConfigError;
use crate::model::{TinyVaultConfig, MIN_KDF_ITERATIONS};

/// Accepted generator lengths.
pub const GENERATOR_LENGTH_RANGE: std::ops::RangeInclusive<usize> = 4..=128;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &TinyVaultConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.vault.kdf_iterations < MIN_KDF_ITERATIONS {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_iterations must be at least {MIN_KDF_ITERATIONS}, got {}",
                config.vault.kdf_iterations
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if !GENERATOR_LENGTH_RANGE.contains(&config.generator.length) {
        errors.push(ConfigError::Validation {
            message: format!(
                "generator.length must be between {} and {}, got {}",
                GENERATOR_LENGTH_RANGE.start(),
                GENERATOR_LENGTH_RANGE.end(),
                config.generator.length
            ),
        });
    }

    if !LOG_LEVELS.contains(&config.logging.level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
