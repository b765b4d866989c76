// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted vault file for keyward.
//!
//! A passphrase is stretched with Argon2id into a 256-bit key, which seals
//! the JSON-encoded credential collection with AES-256-GCM. The salt and cost
//! parameters live in the file header so the key can be re-derived on unlock.

pub mod crypto;
pub mod kdf;
pub mod migration;
pub mod prompt;
pub mod store;

pub use kdf::{KdfParams, VaultKey, derive_key};
pub use migration::{ImportReport, import_legacy};
pub use prompt::{get_vault_passphrase, get_vault_passphrase_with_confirm};
pub use store::VaultStore;
