// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The vault session: master password lifecycle and the encrypted record set.
//!
//! A session moves through three states:
//!
//! ```text
//! Uninitialized --set_master_password--> Locked --unlock--> Unlocked
//!                                          ^                   |
//!                                          +-------lock--------+
//! ```
//!
//! While unlocked the session holds the derived key and the working set of
//! encrypted records. Plaintext passwords exist only in the listings
//! returned to the caller. Every operation takes the state mutex, so
//! mutating operations never interleave. Each transition is published on a
//! [`watch`] channel; see [`VaultSession::watch_status`].

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tinyvault_config::model::VaultConfig;
use tinyvault_core::{
    CredentialStore, DecryptedRecord, MasterCredential, RecordStore, RevealedPassword, VaultError,
    VaultRecord, VaultStatus,
};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::crypto;
use crate::kdf::{self, DerivedKey};

enum SessionState {
    Uninitialized,
    Locked {
        credential: MasterCredential,
    },
    Unlocked {
        credential: MasterCredential,
        key: DerivedKey,
        records: Vec<VaultRecord>,
    },
}

impl SessionState {
    fn status(&self) -> VaultStatus {
        match self {
            Self::Uninitialized => VaultStatus::Uninitialized,
            Self::Locked { .. } => VaultStatus::Locked,
            Self::Unlocked { .. } => VaultStatus::Unlocked,
        }
    }
}

/// A single vault installation bound to its record and credential stores.
pub struct VaultSession {
    store: Arc<dyn RecordStore>,
    credentials: Arc<dyn CredentialStore>,
    kdf_iterations: u32,
    state: Mutex<SessionState>,
    status_tx: watch::Sender<VaultStatus>,
}

impl std::fmt::Debug for VaultSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSession")
            .field("kdf_iterations", &self.kdf_iterations)
            .field("state", &"[REDACTED]")
            .finish()
    }
}

impl VaultSession {
    /// Open a session over the given stores.
    ///
    /// The session starts `Locked` when a master credential is already
    /// stored, `Uninitialized` otherwise. `config.kdf_iterations` applies
    /// only to a credential created by this session.
    pub async fn open(
        store: Arc<dyn RecordStore>,
        credentials: Arc<dyn CredentialStore>,
        config: &VaultConfig,
    ) -> Result<Self, VaultError> {
        let state = match credentials.load_credential().await? {
            Some(credential) => SessionState::Locked { credential },
            None => SessionState::Uninitialized,
        };
        debug!(status = %state.status(), "vault session opened");
        let (status_tx, _) = watch::channel(state.status());

        Ok(Self {
            store,
            credentials,
            kdf_iterations: config.kdf_iterations,
            state: Mutex::new(state),
            status_tx,
        })
    }

    /// Current lifecycle state.
    pub async fn status(&self) -> VaultStatus {
        self.state.lock().await.status()
    }

    /// Subscribe to lifecycle transitions.
    ///
    /// Every successful `set_master_password`, `unlock` and `lock` publishes
    /// the new status, including a repeated unlock of an unlocked session.
    pub fn watch_status(&self) -> watch::Receiver<VaultStatus> {
        self.status_tx.subscribe()
    }

    fn publish(&self, state: &SessionState) {
        self.status_tx.send_replace(state.status());
    }

    /// Create the master credential for a fresh vault.
    ///
    /// Any records left in the store from an earlier installation are
    /// cleared, since they could never be decrypted under the new key.
    pub async fn set_master_password(
        &self,
        master_password: &SecretString,
    ) -> Result<(), VaultError> {
        let mut state = self.state.lock().await;
        if !matches!(*state, SessionState::Uninitialized) {
            return Err(VaultError::AlreadyInitialized);
        }

        let password = master_password.expose_secret();
        if password.trim().is_empty() {
            return Err(VaultError::InvalidInput(
                "master password must not be empty".to_string(),
            ));
        }

        let salt = kdf::generate_salt()?;
        let credential = MasterCredential {
            password_hash: kdf::hash_master_password(password.as_bytes(), &salt),
            salt,
            kdf_iterations: self.kdf_iterations,
        };

        self.store.save_all(&[]).await?;
        self.credentials.save_credential(&credential).await?;

        *state = SessionState::Locked { credential };
        self.publish(&state);
        info!(kdf_iterations = self.kdf_iterations, "master password set");
        Ok(())
    }

    /// Authenticate and load the record set.
    ///
    /// On a wrong password no key is derived and nothing is loaded. Calling
    /// this while already unlocked re-authenticates and reloads from the
    /// store. Returns the decrypted listing.
    pub async fn unlock(
        &self,
        master_password: &SecretString,
    ) -> Result<Vec<DecryptedRecord>, VaultError> {
        let mut state = self.state.lock().await;
        let credential = match &*state {
            SessionState::Uninitialized => return Err(VaultError::NotInitialized),
            SessionState::Locked { credential } | SessionState::Unlocked { credential, .. } => {
                credential.clone()
            }
        };

        let password = master_password.expose_secret();
        if password.is_empty() {
            return Err(VaultError::InvalidInput(
                "master password must not be empty".to_string(),
            ));
        }
        if !kdf::verify_master_password(password.as_bytes(), &credential) {
            warn!("unlock rejected: wrong master password");
            return Err(VaultError::AuthenticationFailed);
        }

        let key = derive_key_blocking(
            Zeroizing::new(password.as_bytes().to_vec()),
            credential.salt,
            credential.kdf_iterations,
        )
        .await?;
        let records = self.store.load_all().await?;
        let listing = decrypt_all(&key, &records);

        info!(records = records.len(), "vault unlocked");
        *state = SessionState::Unlocked {
            credential,
            key,
            records,
        };
        self.publish(&state);
        Ok(listing)
    }

    /// Encrypt and append a record, persisting the full set.
    ///
    /// `site` and `username` are trimmed; the password is stored verbatim.
    /// The in-memory set only changes once the store write succeeds.
    /// Returns the decrypted listing including the new record.
    pub async fn add_record(
        &self,
        site: &str,
        username: &str,
        password: &str,
    ) -> Result<Vec<DecryptedRecord>, VaultError> {
        let mut state = self.state.lock().await;
        let SessionState::Unlocked { key, records, .. } = &mut *state else {
            return Err(VaultError::Locked);
        };

        let site = site.trim();
        if site.is_empty() {
            return Err(VaultError::InvalidInput("site must not be empty".to_string()));
        }
        if password.trim().is_empty() {
            return Err(VaultError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }

        let record = VaultRecord {
            site: site.to_string(),
            username: username.trim().to_string(),
            encrypted_password: crypto::encrypt(key, password)?,
        };
        let mut candidate = records.clone();
        candidate.push(record);

        self.store.save_all(&candidate).await?;
        *records = candidate;
        debug!(site = %site, count = records.len(), "record added");

        Ok(decrypt_all(key, records))
    }

    /// Decrypt and return every record in the working set.
    ///
    /// A record that fails to decrypt is returned as
    /// [`RevealedPassword::Unreadable`]; the rest are unaffected.
    pub async fn list_records(&self) -> Result<Vec<DecryptedRecord>, VaultError> {
        let state = self.state.lock().await;
        let SessionState::Unlocked { key, records, .. } = &*state else {
            return Err(VaultError::Locked);
        };
        Ok(decrypt_all(key, records))
    }

    /// Drop the key and the working set. Nothing is persisted.
    ///
    /// Returns `true` if the session was unlocked.
    pub async fn lock(&self) -> bool {
        let mut state = self.state.lock().await;
        let credential = match &*state {
            SessionState::Unlocked { credential, .. } => credential.clone(),
            _ => return false,
        };
        *state = SessionState::Locked { credential };
        self.publish(&state);
        info!("vault locked");
        true
    }
}

async fn derive_key_blocking(
    master_password: Zeroizing<Vec<u8>>,
    salt: [u8; kdf::SALT_LEN],
    iterations: u32,
) -> Result<DerivedKey, VaultError> {
    tokio::task::spawn_blocking(move || kdf::derive_key(&master_password, &salt, iterations))
        .await
        .map_err(|e| VaultError::Internal(format!("key derivation task failed: {e}")))?
}

fn decrypt_all(key: &DerivedKey, records: &[VaultRecord]) -> Vec<DecryptedRecord> {
    records
        .iter()
        .map(|record| {
            let password = match crypto::decrypt(key, &record.encrypted_password) {
                Ok(plain) => RevealedPassword::Plain(SecretString::from(plain)),
                Err(_) => {
                    warn!(site = %record.site, "record could not be decrypted");
                    RevealedPassword::Unreadable
                }
            };
            DecryptedRecord {
                site: record.site.clone(),
                username: record.username.clone(),
                password,
            }
        })
        .collect()
}
