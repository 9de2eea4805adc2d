// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value settings and the master credential.

use rusqlite::params;
use tinyvault_core::{MasterCredential, VaultError};

use crate::database::{map_read_err, map_write_err, Database};

/// Settings key under which the master credential is stored as JSON.
pub const MASTER_CREDENTIAL_KEY: &str = "master_credential";

/// Read a setting. Returns `None` when the key has never been written.
pub async fn get(db: &Database, key: &str) -> Result<Option<String>, VaultError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
            let result = conn.query_row(
                "SELECT value FROM vault_meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            );
            match result {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_read_err)
}

/// Insert or overwrite a setting.
pub async fn set(db: &Database, key: &str, value: &str) -> Result<(), VaultError> {
    let key = key.to_string();
    let value = value.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO vault_meta (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
            Ok(())
        })
        .await
        .map_err(map_write_err)
}

/// Load the master credential, if one has been saved.
///
/// A stored value that does not parse is a read error, not an absent credential.
pub async fn load_credential(db: &Database) -> Result<Option<MasterCredential>, VaultError> {
    match get(db, MASTER_CREDENTIAL_KEY).await? {
        Some(json) => serde_json::from_str(&json)
            .map(Some)
            .map_err(VaultError::store_read),
        None => Ok(None),
    }
}

/// Persist the master credential, replacing any previous one.
pub async fn save_credential(
    db: &Database,
    credential: &MasterCredential,
) -> Result<(), VaultError> {
    let json = serde_json::to_string(credential).map_err(VaultError::store_write)?;
    set(db, MASTER_CREDENTIAL_KEY, &json).await
}
