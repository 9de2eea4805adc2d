// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All statements are serialized through tokio-rusqlite's single background
//! thread. `Database` is the single writer: query modules accept `&Database`
//! and go through `connection().call()`. Do NOT open additional
//! connections for writes.

use std::path::Path;
use std::time::Duration;

use tinyvault_core::VaultError;
use tracing::debug;

use crate::migrations;

/// Path that opens a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// A migrated SQLite database behind tokio-rusqlite's background thread.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path` in WAL mode and run migrations.
    pub async fn open(path: &str) -> Result<Self, VaultError> {
        Self::open_with_options(path, true).await
    }

    /// Open the database with an explicit journal mode choice.
    ///
    /// Missing parent directories are created.
    pub async fn open_with_options(path: &str, wal_mode: bool) -> Result<Self, VaultError> {
        if path != IN_MEMORY
            && let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(VaultError::store_write)?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(VaultError::store_read)?;

        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            if wal_mode {
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                    row.get::<_, String>(0)
                })?;
            }
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "foreign_keys", true)?;
            conn.busy_timeout(Duration::from_secs(5))?;
            Ok(())
        })
        .await
        .map_err(map_write_err)?;

        conn.call(|conn| -> Result<(), VaultError> { migrations::run_migrations(conn) })
            .await
            .map_err(|e| match e {
                tokio_rusqlite::Error::Error(inner) => inner,
                other => VaultError::store_write(other.to_string()),
            })?;

        debug!(path = %path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// Returns the underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL so the main database file is self-contained.
    pub async fn checkpoint(&self) -> Result<(), VaultError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_write_err)
    }

    /// Close the connection, waiting for queued statements to finish.
    ///
    /// Later statements on this handle fail with a store error.
    pub async fn close(&self) -> Result<(), VaultError> {
        self.conn
            .clone()
            .close()
            .await
            .map_err(VaultError::store_write)?;
        debug!("database closed");
        Ok(())
    }
}

/// Convert a tokio-rusqlite error from a read path into [`VaultError::StoreRead`].
pub(crate) fn map_read_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> VaultError {
    VaultError::store_read(e)
}

/// Convert a tokio-rusqlite error from a write path into [`VaultError::StoreWrite`].
pub(crate) fn map_write_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> VaultError {
    VaultError::store_write(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_file_and_parent_directories() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("vault.db");

        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        assert!(db_path.exists(), "database file should be created");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_runs_migrations() {
        let db = Database::open_with_options(IN_MEMORY, false).await.unwrap();
        let tables: Vec<String> = db
            .connection()
            .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' AND name LIKE 'vault_%' ORDER BY name",
                )?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                rows.collect()
            })
            .await
            .unwrap();
        assert_eq!(tables, vec!["vault_meta", "vault_records"]);
    }

    #[tokio::test]
    async fn reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("vault.db");
        let path = db_path.to_str().unwrap();

        Database::open(path).await.unwrap().close().await.unwrap();
        Database::open(path).await.unwrap().close().await.unwrap();
    }
}
