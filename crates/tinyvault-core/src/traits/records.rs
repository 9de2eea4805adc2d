// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable persistence of the vault record list.

use async_trait::async_trait;

use crate::error::VaultError;
use crate::types::VaultRecord;

/// Durable store for the full list of vault records.
///
/// The store knows nothing about cryptography: it persists the three record
/// fields verbatim. Records have positional identity only.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Atomically replaces the entire persisted record set.
    ///
    /// Implementations backed by transactional storage must never expose a
    /// partially cleared set to a concurrent reader. Fails with
    /// [`VaultError::StoreWrite`] on I/O failure.
    async fn save_all(&self, records: &[VaultRecord]) -> Result<(), VaultError>;

    /// Returns all persisted records in storage order.
    ///
    /// Returns an empty list when nothing was ever saved. Fails with
    /// [`VaultError::StoreRead`] on I/O failure.
    async fn load_all(&self) -> Result<Vec<VaultRecord>, VaultError>;
}
