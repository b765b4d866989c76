// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for keyward.
//!
//! Provides the workspace error type, the credential data model, and the
//! collaborator traits the session layer depends on.

pub mod error;
pub mod traits;
pub mod types;

pub use error::KeywardError;
pub use traits::Clipboard;
pub use types::{Credential, CredentialCollection, CredentialId};
