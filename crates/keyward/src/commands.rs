// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Non-interactive commands: `keyward import` and `keyward check`.

use std::collections::BTreeSet;
use std::io::IsTerminal;
use std::path::Path;

use keyward_config::KeywardConfig;
use keyward_core::{CredentialCollection, CredentialId, KeywardError};
use keyward_search::SearchIndex;
use keyward_vault::{
    KdfParams, VaultKey, VaultStore, derive_key, get_vault_passphrase,
    get_vault_passphrase_with_confirm, import_legacy,
};
use secrecy::SecretString;
use tracing::info;

/// State of the search index relative to the vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    /// Reused index matches the vault.
    Consistent,
    /// Index was missing or stale and has been rebuilt.
    Rebuilt,
    /// Index is not persisted.
    InMemory,
}

/// Outcome of `keyward check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub credentials: usize,
    pub indexed: usize,
    pub index: IndexState,
}

/// Unlock the vault at `store` with `passphrase`.
///
/// A wrong passphrase is fatal here; there is no entry screen to retry on.
pub fn unlock(
    store: &VaultStore,
    passphrase: &SecretString,
) -> Result<(VaultKey, CredentialCollection), KeywardError> {
    let params = store.kdf_params()?.ok_or_else(|| {
        KeywardError::Precondition(format!("no vault at {}", store.path().display()))
    })?;
    let key = derive_key(passphrase, params)?;
    let collection = store.read(&key)?;
    Ok((key, collection))
}

/// Bring the persisted index in line with `collection`.
pub fn sync_index(
    config: &KeywardConfig,
    collection: &CredentialCollection,
) -> Result<(IndexState, usize), KeywardError> {
    let mut index = SearchIndex::open(&config.search)?;
    let expected: BTreeSet<CredentialId> = collection.ids().copied().collect();
    let state = if !config.search.persist_index {
        index.rebuild(collection)?;
        IndexState::InMemory
    } else if index.open_existing() && index.ids()? == expected {
        IndexState::Consistent
    } else {
        index.rebuild(collection)?;
        IndexState::Rebuilt
    };
    let indexed = index.ids()?.len();
    index.close()?;
    Ok((state, indexed))
}

/// Unlock the vault and verify the search index against it.
pub fn check(config: &KeywardConfig, passphrase: &SecretString) -> Result<CheckReport, KeywardError> {
    let store = VaultStore::new(config.vault.path.clone());
    let (_, collection) = unlock(&store, passphrase)?;
    let (index, indexed) = sync_index(config, &collection)?;
    info!(credentials = collection.len(), indexed, ?index, "vault checked");
    Ok(CheckReport {
        credentials: collection.len(),
        indexed,
        index,
    })
}

/// Merge a legacy plaintext map into the vault, creating the vault if needed.
///
/// `passphrase` is asked for lazily: twice when a new vault is created.
pub fn import(
    config: &KeywardConfig,
    source: &Path,
    remove_source: bool,
    passphrase: impl FnOnce(bool) -> Result<SecretString, KeywardError>,
) -> Result<keyward_vault::ImportReport, KeywardError> {
    let store = VaultStore::new(config.vault.path.clone());
    let creating = !store.exists()?;
    let passphrase = passphrase(creating)?;
    let (key, mut collection) = if creating {
        let key = derive_key(&passphrase, KdfParams::generate(&config.vault)?)?;
        (key, CredentialCollection::new())
    } else {
        unlock(&store, &passphrase)?
    };

    let report = import_legacy(source, &store, &key, &mut collection, remove_source)?;
    if creating && report.imported == 0 {
        store.write(&key, &collection)?;
    }
    sync_index(config, &collection)?;
    Ok(report)
}

/// Passphrase source for the CLI commands.
pub fn prompt_passphrase(creating: bool) -> Result<SecretString, KeywardError> {
    if creating {
        get_vault_passphrase_with_confirm()
    } else {
        get_vault_passphrase()
    }
}

pub fn print_check(report: &CheckReport) {
    use colored::Colorize;

    let color = std::io::stdout().is_terminal();
    let ok = |s: &str| if color { s.green().to_string() } else { s.to_owned() };
    let warn = |s: &str| if color { s.yellow().to_string() } else { s.to_owned() };

    println!("  keyward check");
    println!("  {}", "-".repeat(40));
    println!("  {} vault: {} credentials", ok("ok"), report.credentials);
    let (mark, text) = match report.index {
        IndexState::Consistent => (ok("ok"), "consistent"),
        IndexState::Rebuilt => (warn("fixed"), "stale, rebuilt"),
        IndexState::InMemory => (ok("ok"), "not persisted"),
    };
    println!("  {mark} index: {} entries ({text})", report.indexed);
}

pub fn print_import(report: &keyward_vault::ImportReport) {
    println!(
        "keyward: imported {} credentials, skipped {} duplicates",
        report.imported, report.skipped
    );
    if report.source_removed {
        println!("keyward: legacy file removed");
    }
    for warning in &report.warnings {
        eprintln!("keyward: warning: {warning}");
    }
}
