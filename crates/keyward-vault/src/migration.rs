// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot import of a legacy plaintext credential map.
//!
//! The legacy format is a flat TOML table where each key packs the source and
//! username into one string and each value is the password:
//!
//! ```toml
//! "Example Bank bob" = "p@ss"
//! "carol" = "s3cret"
//! ```
//!
//! The last space-separated word is the username; everything before it is the
//! source. A key without a space is a username with an empty source.

use std::path::Path;

use keyward_core::{Credential, CredentialCollection, CredentialId, KeywardError};
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::kdf::VaultKey;
use crate::store::VaultStore;

/// Outcome of [`import_legacy`].
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Credentials added to the vault.
    pub imported: usize,
    /// Entries identical to an existing credential, left out.
    pub skipped: usize,
    /// Whether the plaintext source file was deleted.
    pub source_removed: bool,
    /// Non-fatal problems (e.g. failing to delete the source file).
    pub warnings: Vec<String>,
}

/// Split a legacy key into `(source, username)` at the last space.
pub fn split_legacy_key(key: &str) -> (String, String) {
    match key.trim().rsplit_once(' ') {
        Some((source, username)) => (source.trim_end().to_string(), username.to_string()),
        None => (String::new(), key.trim().to_string()),
    }
}

/// Parse legacy TOML content into credentials, in key order.
pub fn parse_legacy(content: &str) -> Result<Vec<Credential>, KeywardError> {
    let table: toml::Table = content
        .parse()
        .map_err(|e| KeywardError::MalformedInput(format!("legacy file is not valid TOML: {e}")))?;

    table
        .into_iter()
        .map(|(key, value)| {
            let toml::Value::String(password) = value else {
                return Err(KeywardError::MalformedInput(format!(
                    "legacy entry `{key}` must map to a string password"
                )));
            };
            let (source, username) = split_legacy_key(&key);
            Ok(Credential::new(source, username, password))
        })
        .collect()
}

/// Merge the legacy file at `source_path` into `collection` and persist it.
///
/// Each imported credential gets a fresh id. Entries equal to one already in
/// the collection are skipped. The vault is written before `collection` is
/// updated; the source file is deleted only after a successful write and only
/// when `remove_source` is set.
pub fn import_legacy(
    source_path: &Path,
    store: &VaultStore,
    key: &VaultKey,
    collection: &mut CredentialCollection,
    remove_source: bool,
) -> Result<ImportReport, KeywardError> {
    let content = Zeroizing::new(
        std::fs::read_to_string(source_path)
            .map_err(|e| KeywardError::io("failed to read legacy file", source_path, e))?,
    );
    let parsed = parse_legacy(&content)?;

    let mut report = ImportReport::default();
    let mut candidate = collection.clone();
    for credential in parsed {
        if candidate.iter().any(|(_, existing)| *existing == credential) {
            report.skipped += 1;
            continue;
        }
        candidate.insert(CredentialId::new(), credential);
        report.imported += 1;
    }

    if report.imported > 0 {
        store.write(key, &candidate)?;
        *collection = candidate;
    }
    info!(
        imported = report.imported,
        skipped = report.skipped,
        "legacy credentials imported"
    );

    if remove_source {
        match std::fs::remove_file(source_path) {
            Ok(()) => report.source_removed = true,
            Err(e) => {
                let warning = format!(
                    "failed to remove legacy file {}: {e}; it still holds plaintext passwords",
                    source_path.display()
                );
                warn!("{}", warning);
                report.warnings.push(warning);
            }
        }
    }

    Ok(report)
}
