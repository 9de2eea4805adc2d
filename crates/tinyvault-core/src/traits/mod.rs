// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits the vault core consumes.
//!
//! All traits use `#[async_trait]` so sessions can hold them as
//! `Arc<dyn Trait>` and swap SQLite for in-memory stores in tests.

pub mod credential;
pub mod records;
pub mod storage;

pub use credential::CredentialStore;
pub use records::RecordStore;
pub use storage::StorageAdapter;
