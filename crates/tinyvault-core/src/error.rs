// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the TinyVault credential vault.
//!
//! No variant carries key material, master passwords, or decrypted values.
//! Store errors keep the underlying I/O error as their source.

use thiserror::Error;

/// The primary error type used across the vault core and its storage backends.
#[derive(Debug, Error)]
pub enum VaultError {
    /// A required field was empty or a parameter was out of range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The supplied master password does not match the stored credential.
    #[error("authentication failed: wrong master password")]
    AuthenticationFailed,

    /// A ciphertext could not be authenticated or decoded under the session key.
    #[error("decryption failed: wrong key or corrupted record")]
    DecryptionFailed,

    /// The backing store could not be read.
    #[error("store read error: {source}")]
    StoreRead {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The backing store could not be written.
    #[error("store write error: {source}")]
    StoreWrite {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No master password has been set for this vault yet.
    #[error("vault is not initialized -- set a master password first")]
    NotInitialized,

    /// A master password already exists for this vault.
    #[error("vault is already initialized")]
    AlreadyInitialized,

    /// The operation needs an unlocked vault.
    #[error("vault is locked")]
    Locked,

    /// Configuration errors surfaced at runtime.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors (RNG failure, task join failure).
    #[error("internal error: {0}")]
    Internal(String),
}

impl VaultError {
    /// Wrap any error as a [`VaultError::StoreRead`].
    pub fn store_read(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::StoreRead {
            source: source.into(),
        }
    }

    /// Wrap any error as a [`VaultError::StoreWrite`].
    pub fn store_write(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::StoreWrite {
            source: source.into(),
        }
    }

    /// True for failures the caller can fix by re-prompting the user.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::AuthenticationFailed | Self::Locked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_keep_source_message() {
        let err = VaultError::store_write(std::io::Error::other("disk full"));
        assert_eq!(err.to_string(), "store write error: disk full");

        let err = VaultError::store_read("no such table");
        assert_eq!(err.to_string(), "store read error: no such table");
    }

    #[test]
    fn recoverable_errors_are_user_facing_only() {
        assert!(VaultError::AuthenticationFailed.is_recoverable());
        assert!(VaultError::InvalidInput("site".into()).is_recoverable());
        assert!(!VaultError::DecryptionFailed.is_recoverable());
        assert!(!VaultError::store_read("io").is_recoverable());
    }
}
