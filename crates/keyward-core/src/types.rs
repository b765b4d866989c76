// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential model shared by the vault, index, and session crates.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Opaque credential identity, independent of the credential's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialId(Uuid);

impl CredentialId {
    /// Mint a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CredentialId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for CredentialId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A labeled credential. Text is wiped from memory on drop.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    pub source: String,
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new(
        source: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("source", &self.source)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// The canonical credential map: the single source of truth for a session.
///
/// Ordered by identifier so that serialization is canonical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialCollection(BTreeMap<CredentialId, Credential>);

impl CredentialCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: &CredentialId) -> Option<&Credential> {
        self.0.get(id)
    }

    pub fn contains(&self, id: &CredentialId) -> bool {
        self.0.contains_key(id)
    }

    /// Insert or replace a credential, returning the previous value.
    pub fn insert(&mut self, id: CredentialId, credential: Credential) -> Option<Credential> {
        self.0.insert(id, credential)
    }

    pub fn remove(&mut self, id: &CredentialId) -> Option<Credential> {
        self.0.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CredentialId, &Credential)> {
        self.0.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &CredentialId> {
        self.0.keys()
    }
}

impl FromIterator<(CredentialId, Credential)> for CredentialCollection {
    fn from_iter<I: IntoIterator<Item = (CredentialId, Credential)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<(CredentialId, Credential)> for CredentialCollection {
    fn extend<I: IntoIterator<Item = (CredentialId, Credential)>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}
