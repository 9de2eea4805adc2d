// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the TinyVault credential vault.
//!
//! Provides storage with embedded migrations, a single-writer concurrency
//! model via `tokio-rusqlite`, and implementations of the record and
//! credential store traits. Ciphertexts are stored as opaque blobs; this
//! crate never sees a key or a plaintext.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
