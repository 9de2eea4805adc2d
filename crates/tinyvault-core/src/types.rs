// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the vault core and its storage backends.
//!
//! The serde shapes of [`MasterCredential`] and [`VaultRecord`] are the
//! persisted/interchange formats: hashes as hex, byte strings as base64.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle state of a vault session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum VaultStatus {
    /// No master credential exists yet.
    Uninitialized,
    /// A master credential exists, no key is held in memory.
    Locked,
    /// The derived key and working record set are in memory.
    Unlocked,
}

/// Health status reported by storage health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Backend is fully operational.
    Healthy,
    /// Backend is operational but experiencing issues.
    Degraded(String),
    /// Backend is not operational.
    Unhealthy(String),
}

/// The authentication anchor of a vault installation.
///
/// Exactly one exists per vault. `salt` feeds both the authentication digest
/// and key derivation; `kdf_iterations` pins the derivation cost used when the
/// vault was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterCredential {
    /// Lowercase hex digest of the master password.
    #[serde(rename = "hash")]
    pub password_hash: String,

    /// Random salt, generated once at creation.
    #[serde(with = "base64_salt")]
    pub salt: [u8; 16],

    /// PBKDF2 iteration count used for every key derivation of this vault.
    pub kdf_iterations: u32,
}

/// An authenticated-encryption output: nonce plus ciphertext-with-tag.
///
/// The nonce length is not checked here; a malformed value fails at decrypt
/// time instead of at load time so one bad record cannot hide the others.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    #[serde(with = "base64_bytes")]
    pub nonce: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl std::fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ciphertext")
            .field("nonce_len", &self.nonce.len())
            .field("data_len", &self.data.len())
            .finish()
    }
}

/// One stored credential. Only the password is encrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultRecord {
    pub site: String,
    #[serde(default)]
    pub username: String,
    pub encrypted_password: Ciphertext,
}

/// The password half of a [`DecryptedRecord`].
#[derive(Debug, Clone)]
pub enum RevealedPassword {
    /// Successfully decrypted plaintext.
    Plain(SecretString),
    /// Placeholder for a record that failed to decrypt.
    Unreadable,
}

impl RevealedPassword {
    /// Marker shown in place of a password that could not be decrypted.
    pub const UNREADABLE_MARKER: &'static str = "(error decrypting)";

    /// The plaintext, if decryption succeeded.
    pub fn expose(&self) -> Option<&str> {
        match self {
            Self::Plain(secret) => Some(secret.expose_secret()),
            Self::Unreadable => None,
        }
    }

    pub fn is_readable(&self) -> bool {
        matches!(self, Self::Plain(_))
    }
}

/// A record as shown to the caller, with its password decrypted.
#[derive(Debug, Clone)]
pub struct DecryptedRecord {
    pub site: String,
    pub username: String,
    pub password: RevealedPassword,
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

mod base64_salt {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(salt: &[u8; 16], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(salt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 16], D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let bytes = STANDARD.decode(encoded).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("salt must be exactly 16 bytes"))
    }
}
