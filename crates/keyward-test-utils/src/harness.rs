// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Isolated environment for end-to-end session tests.
//!
//! `TestHarness` owns a temporary directory holding the vault file and the
//! search index, and a configuration pointing at them with the cheapest
//! key derivation the validator accepts.

use std::path::{Path, PathBuf};
use std::time::Duration;

use keyward_config::KeywardConfig;
use keyward_config::validation::MIN_KDF_MEMORY_COST;
use keyward_core::KeywardError;
use tempfile::TempDir;

pub const VAULT_FILE: &str = "vault.kw";
pub const INDEX_DIR: &str = "index";

/// Temporary vault and index locations plus a matching configuration.
///
/// Everything is removed when the harness is dropped.
pub struct TestHarness {
    dir: TempDir,
    config: KeywardConfig,
}

impl TestHarness {
    /// Persisted index, ten results per page, 50 ms notifications.
    pub fn new() -> Result<Self, KeywardError> {
        let dir = TempDir::new().map_err(|e| {
            KeywardError::io("failed to create test directory", std::env::temp_dir(), e)
        })?;
        let mut config = KeywardConfig::default();
        config.vault.path = dir.path().join(VAULT_FILE);
        config.vault.kdf_memory_cost = MIN_KDF_MEMORY_COST;
        config.vault.kdf_iterations = 1;
        config.vault.kdf_parallelism = 1;
        config.search.index_dir = dir.path().join(INDEX_DIR);
        config.search.persist_index = true;
        config.ui.page_size = 10;
        config.ui.notification_ms = 50;
        config.logging.file = dir.path().join("keyward.log");
        Ok(Self { dir, config })
    }

    /// Keep the index in memory instead of on disk.
    pub fn with_memory_index(mut self) -> Self {
        self.config.search.persist_index = false;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.config.ui.page_size = page_size;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.config.search.max_results = max_results;
        self
    }

    /// A copy of the configuration.
    pub fn config(&self) -> KeywardConfig {
        self.config.clone()
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn vault_path(&self) -> PathBuf {
        self.config.vault.path.clone()
    }

    pub fn index_dir(&self) -> PathBuf {
        self.config.search.index_dir.clone()
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.config.ui.notification_ms)
    }

    /// Raw vault bytes, or `None` while no vault exists.
    pub fn vault_bytes(&self) -> Option<Vec<u8>> {
        std::fs::read(self.vault_path()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_points_inside_the_temp_dir() {
        let harness = TestHarness::new().unwrap();
        assert!(harness.vault_path().starts_with(harness.dir()));
        assert!(harness.index_dir().starts_with(harness.dir()));
        assert!(harness.vault_bytes().is_none());
    }

    #[test]
    fn harness_config_passes_validation() {
        let harness = TestHarness::new().unwrap();
        assert!(keyward_config::validation::validate_config(&harness.config()).is_ok());
    }
}
