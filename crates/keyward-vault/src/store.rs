// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The encrypted vault file.
//!
//! Layout:
//!
//! ```text
//! "KWV" | version u8 | m_cost u32 LE | t_cost u32 LE | p_cost u32 LE | salt[16] | nonce[12] | ciphertext+tag
//! ```
//!
//! Everything before the nonce is the header and is authenticated as AEAD
//! associated data. The plaintext is the JSON encoding of a
//! [`CredentialCollection`].

use std::io::Write;
use std::path::{Path, PathBuf};

use keyward_config::validation::{MAX_KDF_ITERATIONS, MAX_KDF_MEMORY_COST, MAX_KDF_PARALLELISM};
use keyward_core::{CredentialCollection, KeywardError};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::crypto::{self, NONCE_LEN};
use crate::kdf::{KdfParams, SALT_LEN, VaultKey};

/// File signature.
pub const MAGIC: [u8; 3] = *b"KWV";

/// Current file format version.
pub const FORMAT_VERSION: u8 = 1;

/// Header length: magic, version, three cost parameters, salt.
pub const HEADER_LEN: usize = MAGIC.len() + 1 + 3 * 4 + SALT_LEN;

/// Reads and writes the vault file. Nothing else touches it.
#[derive(Debug, Clone)]
pub struct VaultStore {
    path: PathBuf,
}

impl VaultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the vault file exists and is non-empty.
    pub fn exists(&self) -> Result<bool, KeywardError> {
        match std::fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() > 0),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(KeywardError::io("failed to stat vault", &self.path, e)),
        }
    }

    /// KDF parameters recorded in the current file, or `None` for an absent or empty vault.
    pub fn kdf_params(&self) -> Result<Option<KdfParams>, KeywardError> {
        let bytes = self.load()?;
        if bytes.is_empty() {
            return Ok(None);
        }
        decode_header(&bytes).map(Some)
    }

    /// Decrypt the vault into a collection.
    ///
    /// An absent or empty file is an empty collection. Failed authentication
    /// is reported as [`KeywardError::WrongPassphrase`].
    pub fn read(&self, key: &VaultKey) -> Result<CredentialCollection, KeywardError> {
        let bytes = self.load()?;
        if bytes.is_empty() {
            debug!(path = %self.path.display(), "vault absent or empty");
            return Ok(CredentialCollection::new());
        }

        decode_header(&bytes)?;
        let (header, sealed) = bytes.split_at(HEADER_LEN);
        let plaintext = crypto::open(key, sealed, header).map_err(|e| match e {
            KeywardError::AuthenticationFailed => KeywardError::WrongPassphrase,
            other => other,
        })?;

        let collection: CredentialCollection = serde_json::from_slice(&plaintext)
            .map_err(|e| KeywardError::Corrupt(format!("failed to decode credentials: {e}")))?;
        debug!(entries = collection.len(), "vault decrypted");
        Ok(collection)
    }

    /// Encrypt `collection` under `key` and atomically replace the vault file.
    ///
    /// The sealed payload goes to a temporary file in the vault's directory,
    /// which is synced and renamed over the vault path.
    pub fn write(&self, key: &VaultKey, collection: &CredentialCollection) -> Result<(), KeywardError> {
        let header = encode_header(key.params());
        let plaintext = Zeroizing::new(
            serde_json::to_vec(collection)
                .map_err(|e| KeywardError::Internal(format!("failed to encode credentials: {e}")))?,
        );
        let sealed = crypto::seal(key, &plaintext, &header)?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)
            .map_err(|e| KeywardError::io("failed to create vault directory", &dir, e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .map_err(|e| KeywardError::io("failed to create temporary vault file", &dir, e))?;
        tmp.write_all(&header)
            .and_then(|()| tmp.write_all(&sealed))
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| KeywardError::io("failed to write temporary vault file", tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| KeywardError::io("failed to replace vault", &self.path, e.error))?;

        info!(
            path = %self.path.display(),
            entries = collection.len(),
            "vault written"
        );
        Ok(())
    }

    fn load(&self) -> Result<Vec<u8>, KeywardError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(KeywardError::io("failed to read vault", &self.path, e)),
        }
    }
}

fn encode_header(params: &KdfParams) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    header[..3].copy_from_slice(&MAGIC);
    header[3] = FORMAT_VERSION;
    header[4..8].copy_from_slice(&params.memory_cost.to_le_bytes());
    header[8..12].copy_from_slice(&params.iterations.to_le_bytes());
    header[12..16].copy_from_slice(&params.parallelism.to_le_bytes());
    header[16..].copy_from_slice(&params.salt);
    header
}

fn decode_header(bytes: &[u8]) -> Result<KdfParams, KeywardError> {
    if bytes.len() < HEADER_LEN + NONCE_LEN {
        return Err(KeywardError::MalformedInput(format!(
            "vault file is {} bytes, too short for a header and nonce",
            bytes.len()
        )));
    }
    if bytes[..3] != MAGIC {
        return Err(KeywardError::MalformedInput(
            "not a keyward vault (bad magic)".to_string(),
        ));
    }
    if bytes[3] != FORMAT_VERSION {
        return Err(KeywardError::MalformedInput(format!(
            "unsupported vault format version {}",
            bytes[3]
        )));
    }

    let word = |at: usize| u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&bytes[16..HEADER_LEN]);
    let params = KdfParams {
        memory_cost: word(4),
        iterations: word(8),
        parallelism: word(12),
        salt,
    };

    // The header is only authenticated after the key is derived, so its
    // costs are bounded before Argon2 ever sees them.
    let in_range = [
        (params.memory_cost, MAX_KDF_MEMORY_COST),
        (params.iterations, MAX_KDF_ITERATIONS),
        (params.parallelism, MAX_KDF_PARALLELISM),
    ]
    .iter()
    .all(|&(value, max)| (1..=max).contains(&value));
    if !in_range {
        return Err(KeywardError::MalformedInput(format!(
            "vault header KDF costs out of range (m={}, t={}, p={})",
            params.memory_cost, params.iterations, params.parallelism
        )));
    }
    Ok(params)
}
