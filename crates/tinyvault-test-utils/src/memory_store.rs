// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory store for deterministic session tests.
//!
//! `MemoryStore` implements both vault store traits. Reads and writes can be
//! made to fail on demand, and load calls are counted so tests can assert
//! that nothing was read.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use tinyvault_core::{
    CredentialStore, HealthStatus, MasterCredential, RecordStore, StorageAdapter, VaultError,
    VaultRecord,
};

/// A record and credential store backed by process memory.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<VaultRecord>>,
    credential: Mutex<Option<MasterCredential>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    loads: AtomicUsize,
    saves: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent read fail with `StoreRead`.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail with `StoreWrite`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Replace the stored records directly, bypassing the failure flags.
    pub async fn seed_records(&self, records: Vec<VaultRecord>) {
        *self.records.lock().await = records;
    }

    /// Snapshot of the stored records.
    pub async fn records(&self) -> Vec<VaultRecord> {
        self.records.lock().await.clone()
    }

    /// The stored credential, if any.
    pub async fn credential(&self) -> Option<MasterCredential> {
        self.credential.lock().await.clone()
    }

    /// Number of `load_all` calls so far.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Number of successful `save_all` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn check_read(&self) -> Result<(), VaultError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(VaultError::store_read("injected read failure"));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), VaultError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(VaultError::store_write("injected write failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn save_all(&self, records: &[VaultRecord]) -> Result<(), VaultError> {
        self.check_write()?;
        *self.records.lock().await = records.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<VaultRecord>, VaultError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.check_read()?;
        Ok(self.records.lock().await.clone())
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn load_credential(&self) -> Result<Option<MasterCredential>, VaultError> {
        self.check_read()?;
        Ok(self.credential.lock().await.clone())
    }

    async fn save_credential(&self, credential: &MasterCredential) -> Result<(), VaultError> {
        self.check_write()?;
        *self.credential.lock().await = Some(credential.clone());
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn initialize(&self) -> Result<(), VaultError> {
        Ok(())
    }

    async fn health_check(&self) -> Result<HealthStatus, VaultError> {
        if self.fail_reads.load(Ordering::SeqCst) || self.fail_writes.load(Ordering::SeqCst) {
            return Ok(HealthStatus::Degraded("failure injection active".into()));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn close(&self) -> Result<(), VaultError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinyvault_core::Ciphertext;

    fn record(site: &str) -> VaultRecord {
        VaultRecord {
            site: site.into(),
            username: String::new(),
            encrypted_password: Ciphertext {
                nonce: vec![0; 12],
                data: vec![0; 16],
            },
        }
    }

    #[tokio::test]
    async fn save_replaces_and_load_counts() {
        let store = MemoryStore::new();
        store.save_all(&[record("a"), record("b")]).await.unwrap();
        store.save_all(&[record("c")]).await.unwrap();

        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(store.load_count(), 1);
        assert_eq!(store.save_count(), 2);
    }

    #[tokio::test]
    async fn injected_failures_surface_as_store_errors() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        assert!(matches!(
            store.save_all(&[record("a")]).await,
            Err(VaultError::StoreWrite { .. })
        ));
        assert!(store.records().await.is_empty());
        assert!(matches!(
            store.health_check().await.unwrap(),
            HealthStatus::Degraded(_)
        ));

        store.set_fail_writes(false);
        store.set_fail_reads(true);
        assert!(matches!(
            store.load_all().await,
            Err(VaultError::StoreRead { .. })
        ));
        assert!(matches!(
            store.load_credential().await,
            Err(VaultError::StoreRead { .. })
        ));
    }
}
