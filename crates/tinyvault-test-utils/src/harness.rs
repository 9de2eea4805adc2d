// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite test harness.
//!
//! `TempStorage` opens a [`SqliteStorage`] inside a temporary directory that
//! lives as long as the harness, so a test can close and reopen the same
//! database file.

use std::path::PathBuf;

use tinyvault_config::model::{StorageConfig, VaultConfig};
use tinyvault_core::{StorageAdapter, VaultError};
use tinyvault_storage::SqliteStorage;

/// PBKDF2 iteration count for tests. Far below the production minimum.
pub const TEST_KDF_ITERATIONS: u32 = 1_000;

/// A [`VaultConfig`] with [`TEST_KDF_ITERATIONS`].
pub fn test_vault_config() -> VaultConfig {
    VaultConfig {
        kdf_iterations: TEST_KDF_ITERATIONS,
    }
}

/// A temporary directory holding one vault database.
pub struct TempStorage {
    dir: tempfile::TempDir,
}

impl TempStorage {
    /// Create an empty temporary directory.
    pub fn new() -> Result<Self, VaultError> {
        let dir = tempfile::TempDir::new().map_err(VaultError::store_write)?;
        Ok(Self { dir })
    }

    /// Path of the database file inside the directory.
    pub fn database_path(&self) -> PathBuf {
        self.dir.path().join("vault.db")
    }

    /// Storage configuration pointing at [`database_path`](Self::database_path).
    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig {
            database_path: self.database_path().to_string_lossy().into_owned(),
            wal_mode: true,
        }
    }

    /// Open (or reopen) the database and run migrations.
    pub async fn open(&self) -> Result<SqliteStorage, VaultError> {
        let storage = SqliteStorage::new(self.storage_config());
        storage.initialize().await?;
        Ok(storage)
    }
}
