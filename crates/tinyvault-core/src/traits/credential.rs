// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-value settings store holding the master credential.

use async_trait::async_trait;

use crate::error::VaultError;
use crate::types::MasterCredential;

/// Durable store for the vault's one [`MasterCredential`].
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns the stored credential, or `None` for a fresh installation.
    async fn load_credential(&self) -> Result<Option<MasterCredential>, VaultError>;

    /// Persists the credential, replacing any previous value.
    async fn save_credential(&self, credential: &MasterCredential) -> Result<(), VaultError>;
}
