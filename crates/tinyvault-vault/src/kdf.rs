// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master password handling: key derivation and authentication digest.
//!
//! Two independent values come out of the master password:
//! - a 32-byte encryption key via PBKDF2-HMAC-SHA256 (slow, iterated),
//! - a salted SHA-256 digest used only to check the password before
//!   deriving a key.
//!
//! The digest is never used as key material.

use std::num::NonZeroU32;

use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tinyvault_core::{MasterCredential, VaultError};
use zeroize::Zeroizing;

/// Length in bytes of a derived key.
pub const KEY_LEN: usize = 32;

/// Length in bytes of the per-vault salt.
pub const SALT_LEN: usize = 16;

/// A 256-bit AES key derived from the master password.
///
/// Lives only in memory and is zeroed on drop.
pub struct DerivedKey(Zeroizing<[u8; KEY_LEN]>);

impl DerivedKey {
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive a 32-byte key from the master password using PBKDF2-HMAC-SHA256.
///
/// Deterministic for identical inputs. Zero iterations is rejected.
pub fn derive_key(
    master_password: &[u8],
    salt: &[u8; SALT_LEN],
    iterations: u32,
) -> Result<DerivedKey, VaultError> {
    let iterations = NonZeroU32::new(iterations).ok_or_else(|| {
        VaultError::InvalidInput("kdf iterations must be greater than zero".to_string())
    })?;

    let mut output = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        master_password,
        &mut output[..],
    );
    Ok(DerivedKey(output))
}

/// Lowercase hex SHA-256 digest of `salt || master_password`.
pub fn hash_master_password(master_password: &[u8], salt: &[u8; SALT_LEN]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(master_password);
    hex::encode(hasher.finalize())
}

/// Check a candidate master password against the stored credential.
///
/// Digests are compared in constant time.
pub fn verify_master_password(master_password: &[u8], credential: &MasterCredential) -> bool {
    let candidate = hash_master_password(master_password, &credential.salt);
    candidate
        .as_bytes()
        .ct_eq(credential.password_hash.as_bytes())
        .into()
}

/// Generate a random 16-byte salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN], VaultError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| VaultError::Internal("failed to generate random salt".to_string()))?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Low cost for fast tests.
    const TEST_ITERATIONS: u32 = 1_000;

    #[test]
    fn derive_key_produces_consistent_output() {
        let salt = [1u8; 16];
        let key1 = derive_key(b"correct-horse", &salt, TEST_ITERATIONS).unwrap();
        let key2 = derive_key(b"correct-horse", &salt, TEST_ITERATIONS).unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn derive_key_depends_on_salt_and_iterations() {
        let base = derive_key(b"pw", &[1u8; 16], TEST_ITERATIONS).unwrap();
        let other_salt = derive_key(b"pw", &[2u8; 16], TEST_ITERATIONS).unwrap();
        let other_cost = derive_key(b"pw", &[1u8; 16], TEST_ITERATIONS + 1).unwrap();

        assert_ne!(base.as_bytes(), other_salt.as_bytes());
        assert_ne!(base.as_bytes(), other_cost.as_bytes());
    }

    #[test]
    fn zero_iterations_is_invalid_input() {
        let err = derive_key(b"pw", &[0u8; 16], 0).unwrap_err();
        assert!(matches!(err, VaultError::InvalidInput(_)));
    }

    #[test]
    fn empty_password_still_derives() {
        assert!(derive_key(b"", &[0u8; 16], TEST_ITERATIONS).is_ok());
    }

    #[test]
    fn derived_key_debug_is_redacted() {
        let key = derive_key(b"pw", &[0u8; 16], TEST_ITERATIONS).unwrap();
        assert_eq!(format!("{key:?}"), "DerivedKey([REDACTED])");
    }

    #[test]
    fn hash_is_lowercase_hex_and_salted() {
        let a = hash_master_password(b"correct-horse", &[1u8; 16]);
        let b = hash_master_password(b"correct-horse", &[2u8; 16]);

        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        assert_ne!(a, b);
    }

    #[test]
    fn verify_accepts_only_the_enrolled_password() {
        let salt = generate_salt().unwrap();
        let credential = MasterCredential {
            password_hash: hash_master_password(b"correct-horse", &salt),
            salt,
            kdf_iterations: TEST_ITERATIONS,
        };

        assert!(verify_master_password(b"correct-horse", &credential));
        assert!(!verify_master_password(b"wrong", &credential));
        assert!(!verify_master_password(b"", &credential));
    }

    #[test]
    fn generate_salt_produces_random_values() {
        assert_ne!(generate_salt().unwrap(), generate_salt().unwrap());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn distinct_passwords_yield_distinct_keys(a in ".{0,24}", b in ".{0,24}") {
            prop_assume!(a != b);
            let salt = [9u8; 16];
            let ka = derive_key(a.as_bytes(), &salt, 10).unwrap();
            let kb = derive_key(b.as_bytes(), &salt, 10).unwrap();
            prop_assert_ne!(ka.as_bytes(), kb.as_bytes());
        }
    }
}
