// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end vault lifecycle against a real SQLite database.

use std::sync::Arc;

use secrecy::SecretString;
use tinyvault_core::{RecordStore, StorageAdapter, VaultError, VaultStatus};
use tinyvault_test_utils::{test_vault_config, TempStorage};
use tinyvault_vault::VaultSession;

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

async fn open_session(temp: &TempStorage) -> (VaultSession, Arc<tinyvault_storage::SqliteStorage>) {
    let storage = Arc::new(temp.open().await.unwrap());
    let session = VaultSession::open(storage.clone(), storage.clone(), &test_vault_config())
        .await
        .unwrap();
    (session, storage)
}

#[tokio::test]
async fn create_add_lock_unlock_across_restart() {
    let temp = TempStorage::new().unwrap();

    {
        let (session, storage) = open_session(&temp).await;
        assert_eq!(session.status().await, VaultStatus::Uninitialized);

        session.set_master_password(&secret("correct-horse")).await.unwrap();
        let listing = session.unlock(&secret("correct-horse")).await.unwrap();
        assert!(listing.is_empty());

        let listing = session
            .add_record("example.com", "alice", "p@ss1")
            .await
            .unwrap();
        assert_eq!(listing.len(), 1);

        assert!(session.lock().await);
        storage.close().await.unwrap();
    }

    let (session, storage) = open_session(&temp).await;
    assert_eq!(session.status().await, VaultStatus::Locked);

    let listing = session.unlock(&secret("correct-horse")).await.unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].site, "example.com");
    assert_eq!(listing[0].username, "alice");
    assert_eq!(listing[0].password.expose(), Some("p@ss1"));

    let stored = storage.load_all().await.unwrap();
    assert_ne!(stored[0].encrypted_password.data, b"p@ss1".to_vec());
}

#[tokio::test]
async fn wrong_password_after_restart_is_rejected() {
    let temp = TempStorage::new().unwrap();
    {
        let (session, _storage) = open_session(&temp).await;
        session.set_master_password(&secret("correct-horse")).await.unwrap();
    }

    let (session, _storage) = open_session(&temp).await;
    let err = session.unlock(&secret("battery-staple")).await.unwrap_err();
    assert!(matches!(err, VaultError::AuthenticationFailed));
    assert_eq!(session.status().await, VaultStatus::Locked);
}

#[tokio::test]
async fn records_keep_insertion_order() {
    let temp = TempStorage::new().unwrap();
    let (session, _storage) = open_session(&temp).await;
    session.set_master_password(&secret("correct-horse")).await.unwrap();
    session.unlock(&secret("correct-horse")).await.unwrap();

    for (i, site) in ["c.example", "a.example", "b.example", "a.example"].iter().enumerate() {
        session
            .add_record(site, "", &format!("pw-{i}"))
            .await
            .unwrap();
    }

    let listing = session.list_records().await.unwrap();
    let sites: Vec<_> = listing.iter().map(|r| r.site.as_str()).collect();
    assert_eq!(sites, ["c.example", "a.example", "b.example", "a.example"]);
    assert_eq!(listing[3].password.expose(), Some("pw-3"));
}

#[tokio::test]
async fn concurrent_adds_are_serialized() {
    let temp = TempStorage::new().unwrap();
    let (session, storage) = open_session(&temp).await;
    let session = Arc::new(session);
    session.set_master_password(&secret("correct-horse")).await.unwrap();
    session.unlock(&secret("correct-horse")).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let session = session.clone();
        handles.push(tokio::spawn(async move {
            session
                .add_record(&format!("site{i}.example"), "", "pw")
                .await
                .map(|_| ())
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(session.list_records().await.unwrap().len(), 8);
    assert_eq!(storage.load_all().await.unwrap().len(), 8);
}
