// SPDX-FileCopyrightText: 2026 TinyVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The TinyVault credential vault.
//!
//! Record passwords are encrypted individually with AES-256-GCM under a key
//! derived from the master password via PBKDF2-HMAC-SHA256. The key exists
//! only while a [`VaultSession`] is unlocked. A salted SHA-256 digest of the
//! master password is stored to reject wrong passwords before any key is
//! derived.

pub mod autolock;
pub mod crypto;
pub mod generator;
pub mod kdf;
pub mod prompt;
pub mod session;

pub use autolock::AutoLock;
pub use generator::generate_password;
pub use kdf::DerivedKey;
pub use prompt::{get_master_password, get_master_password_with_confirm};
pub use session::VaultSession;
