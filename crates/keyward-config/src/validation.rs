// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that run after deserialization succeeded.
//!
//! Every rule is evaluated and all violations are reported together.

use std::path::Path;

use crate::diagnostic::ConfigError;
use crate::model::KeywardConfig;

/// Lowest accepted Argon2id memory cost in KiB (8 MiB).
pub const MIN_KDF_MEMORY_COST: u32 = 8192;

/// Highest accepted Argon2id memory cost in KiB (4 GiB).
pub const MAX_KDF_MEMORY_COST: u32 = 4 * 1024 * 1024;

/// Highest accepted Argon2id pass count.
pub const MAX_KDF_ITERATIONS: u32 = 16;

/// Highest accepted Argon2id lane count.
pub const MAX_KDF_PARALLELISM: u32 = 64;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
pub fn validate_config(config: &KeywardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if is_blank(&config.vault.path) {
        fail("vault.path must not be empty".to_string());
    }
    if config.vault.kdf_memory_cost < MIN_KDF_MEMORY_COST {
        fail(format!(
            "vault.kdf_memory_cost must be at least {MIN_KDF_MEMORY_COST} (8 MiB), got {}",
            config.vault.kdf_memory_cost
        ));
    }
    if config.vault.kdf_memory_cost > MAX_KDF_MEMORY_COST {
        fail(format!(
            "vault.kdf_memory_cost must be at most {MAX_KDF_MEMORY_COST} (4 GiB), got {}",
            config.vault.kdf_memory_cost
        ));
    }
    if !(1..=MAX_KDF_ITERATIONS).contains(&config.vault.kdf_iterations) {
        fail(format!(
            "vault.kdf_iterations must be between 1 and {MAX_KDF_ITERATIONS}, got {}",
            config.vault.kdf_iterations
        ));
    }
    if !(1..=MAX_KDF_PARALLELISM).contains(&config.vault.kdf_parallelism) {
        fail(format!(
            "vault.kdf_parallelism must be between 1 and {MAX_KDF_PARALLELISM}, got {}",
            config.vault.kdf_parallelism
        ));
    }

    if config.search.persist_index && is_blank(&config.search.index_dir) {
        fail("search.index_dir must not be empty when search.persist_index is true".to_string());
    }
    if config.search.max_results == 0 {
        fail("search.max_results must be at least 1".to_string());
    }

    if config.ui.page_size == 0 {
        fail("ui.page_size must be at least 1".to_string());
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "logging.level `{}` is not one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }
    if is_blank(&config.logging.file) {
        fail("logging.file must not be empty".to_string());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().is_empty()
}
