// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the TinyVault credential vault.
//!
//! This crate provides the error taxonomy, the domain types persisted by the
//! vault, and the store traits the vault session is written against.
//! Storage backends implement the traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VaultError;
pub use types::{
    Ciphertext, DecryptedRecord, HealthStatus, MasterCredential, RevealedPassword, VaultRecord,
    VaultStatus,
};

pub use traits::{CredentialStore, RecordStore, StorageAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vault_error_has_all_variants() {
        let _invalid = VaultError::InvalidInput("site".into());
        let _auth = VaultError::AuthenticationFailed;
        let _decrypt = VaultError::DecryptionFailed;
        let _read = VaultError::StoreRead {
            source: Box::new(std::io::Error::other("test")),
        };
        let _write = VaultError::StoreWrite {
            source: Box::new(std::io::Error::other("test")),
        };
        let _uninit = VaultError::NotInitialized;
        let _init = VaultError::AlreadyInitialized;
        let _locked = VaultError::Locked;
        let _config = VaultError::Config("test".into());
        let _internal = VaultError::Internal("test".into());
    }

    #[test]
    fn crypto_failures_carry_no_payload() {
        assert_eq!(
            VaultError::AuthenticationFailed.to_string(),
            "authentication failed: wrong master password"
        );
        assert_eq!(
            VaultError::DecryptionFailed.to_string(),
            "decryption failed: wrong key or corrupted record"
        );
    }

    #[test]
    fn all_store_traits_are_exported() {
        fn _assert_record_store<T: RecordStore>() {}
        fn _assert_credential_store<T: CredentialStore>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
    }
}
