// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted record persistence.
//!
//! The record set is always written as a whole: `save_all` replaces the
//! table contents inside one transaction, so a failed write leaves the
//! previous set intact.

use rusqlite::params;
use tinyvault_core::{Ciphertext, VaultError, VaultRecord};

use crate::database::{map_read_err, map_write_err, Database};

/// Replace the stored record set with `records`, preserving order.
pub async fn save_all(db: &Database, records: &[VaultRecord]) -> Result<(), VaultError> {
    let records = records.to_vec();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM vault_records", [])?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO vault_records (site, username, nonce, ciphertext)
                     VALUES (?1, ?2, ?3, ?4)",
                )?;
                for record in &records {
                    stmt.execute(params![
                        record.site,
                        record.username,
                        record.encrypted_password.nonce,
                        record.encrypted_password.data,
                    ])?;
                }
            }
            tx.commit()
        })
        .await
        .map_err(map_write_err)
}

/// Load every stored record in insertion order. An empty table yields an empty vec.
pub async fn load_all(db: &Database) -> Result<Vec<VaultRecord>, VaultError> {
    db.connection()
        .call(|conn| -> Result<Vec<VaultRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT site, username, nonce, ciphertext FROM vault_records ORDER BY id",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(VaultRecord {
                    site: row.get(0)?,
                    username: row.get(1)?,
                    encrypted_password: Ciphertext {
                        nonce: row.get(2)?,
                        data: row.get(3)?,
                    },
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_read_err)
}

/// Number of stored records.
pub async fn count(db: &Database) -> Result<usize, VaultError> {
    db.connection()
        .call(|conn| -> Result<i64, rusqlite::Error> {
            conn.query_row("SELECT COUNT(*) FROM vault_records", [], |row| row.get(0))
        })
        .await
        .map(|n| n.max(0) as usize)
        .map_err(map_read_err)
}
