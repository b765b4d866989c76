// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for keyward.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level keyward configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeywardConfig {
    /// Vault file location and key derivation cost.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Search index settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Interaction settings (paging, notifications).
    #[serde(default)]
    pub ui: UiConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Vault file and Argon2id configuration.
///
/// KDF parameters apply to newly created vaults and passphrase changes; an
/// existing vault is always unlocked with the parameters stored in its header.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Path to the encrypted vault file.
    #[serde(default = "default_vault_path")]
    pub path: PathBuf,

    /// Argon2id memory cost in KiB (default: 65536 = 64 MiB).
    #[serde(default = "default_kdf_memory_cost")]
    pub kdf_memory_cost: u32,

    /// Argon2id iteration count (default: 3).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Argon2id parallelism lanes (default: 4).
    #[serde(default = "default_kdf_parallelism")]
    pub kdf_parallelism: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            path: default_vault_path(),
            kdf_memory_cost: default_kdf_memory_cost(),
            kdf_iterations: default_kdf_iterations(),
            kdf_parallelism: default_kdf_parallelism(),
        }
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("keyward"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_vault_path() -> PathBuf {
    data_dir().join("vault.kw")
}

fn default_kdf_memory_cost() -> u32 {
    65536 // 64 MiB per OWASP recommendation
}

fn default_kdf_iterations() -> u32 {
    3
}

fn default_kdf_parallelism() -> u32 {
    4
}

/// Search index configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Directory holding the persisted index.
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,

    /// Persist the index to disk. When false the index lives in memory and is
    /// rebuilt on every unlock, so sources and usernames never touch disk.
    #[serde(default = "default_persist_index")]
    pub persist_index: bool,

    /// Upper bound on the number of results a non-empty query returns.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index_dir: default_index_dir(),
            persist_index: default_persist_index(),
            max_results: default_max_results(),
        }
    }
}

fn default_index_dir() -> PathBuf {
    data_dir().join("index")
}

fn default_persist_index() -> bool {
    true
}

fn default_max_results() -> usize {
    800
}

/// Interaction configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UiConfig {
    /// Results shown per page in the navigation list.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// How long a transient notification stays visible, in milliseconds.
    #[serde(default = "default_notification_ms")]
    pub notification_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            notification_ms: default_notification_ms(),
        }
    }
}

fn default_page_size() -> usize {
    10
}

fn default_notification_ms() -> u64 {
    1000
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file. The terminal belongs to the UI, so logs never go to stdout.
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> PathBuf {
    data_dir().join("keyward.log")
}
