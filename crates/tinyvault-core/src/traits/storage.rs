// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle trait for persistence backends (SQLite, in-memory).

use async_trait::async_trait;

use crate::error::VaultError;
use crate::traits::credential::CredentialStore;
use crate::traits::records::RecordStore;
use crate::types::HealthStatus;

/// A backend that provides both vault stores plus an explicit lifecycle.
#[async_trait]
pub trait StorageAdapter: RecordStore + CredentialStore + 'static {
    /// Returns the human-readable name of this backend.
    fn name(&self) -> &str;

    /// Opens connections and applies schema migrations.
    async fn initialize(&self) -> Result<(), VaultError>;

    /// Performs a health check and returns the backend's current status.
    async fn health_check(&self) -> Result<HealthStatus, VaultError>;

    /// Flushes pending writes and releases resources.
    async fn close(&self) -> Result<(), VaultError>;
}
