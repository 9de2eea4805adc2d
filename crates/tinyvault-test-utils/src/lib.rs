// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for TinyVault integration tests.
//!
//! # Components
//!
//! - [`MemoryStore`] - In-memory record and credential store with failure injection
//! - [`TempStorage`] - SQLite storage in a temporary directory

pub mod harness;
pub mod memory_store;

pub use harness::{test_vault_config, TempStorage, TEST_KDF_ITERATIONS};
pub use memory_store::MemoryStore;
