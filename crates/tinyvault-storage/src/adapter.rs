// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the vault store traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use tinyvault_config::model::StorageConfig;
use tinyvault_core::{
    CredentialStore, HealthStatus, MasterCredential, RecordStore, StorageAdapter, VaultError,
    VaultRecord,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates to the typed query modules.
/// The database is lazily opened on the first call to
/// [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`](StorageAdapter::initialize) is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Create and initialize in one step.
    pub async fn open(config: StorageConfig) -> Result<Self, VaultError> {
        let storage = Self::new(config);
        storage.initialize().await?;
        Ok(storage)
    }

    /// Path of the backing database file.
    pub fn database_path(&self) -> &str {
        &self.config.database_path
    }

    fn db(&self) -> Result<&Database, VaultError> {
        self.db.get().ok_or_else(|| {
            VaultError::Internal("storage not initialized -- call initialize() first".into())
        })
    }
}

#[async_trait]
impl RecordStore for SqliteStorage {
    async fn save_all(&self, records: &[VaultRecord]) -> Result<(), VaultError> {
        queries::records::save_all(self.db()?, records).await?;
        debug!(count = records.len(), "record set saved");
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<VaultRecord>, VaultError> {
        queries::records::load_all(self.db()?).await
    }
}

#[async_trait]
impl CredentialStore for SqliteStorage {
    async fn load_credential(&self) -> Result<Option<MasterCredential>, VaultError> {
        queries::meta::load_credential(self.db()?).await
    }

    async fn save_credential(&self, credential: &MasterCredential) -> Result<(), VaultError> {
        queries::meta::save_credential(self.db()?, credential).await
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn initialize(&self) -> Result<(), VaultError> {
        let db = Database::open_with_options(&self.config.database_path, self.config.wal_mode)
            .await?;
        self.db
            .set(db)
            .map_err(|_| VaultError::Internal("storage already initialized".into()))?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn health_check(&self) -> Result<HealthStatus, VaultError> {
        let Ok(db) = self.db() else {
            return Ok(HealthStatus::Unhealthy("not initialized".into()));
        };
        match queries::records::count(db).await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Degraded(e.to_string())),
        }
    }

    async fn close(&self) -> Result<(), VaultError> {
        let db = self.db()?;
        if self.config.wal_mode {
            db.checkpoint().await?;
            debug!("WAL checkpoint complete");
        }
        db.close().await
    }
}
