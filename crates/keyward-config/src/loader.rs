// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./keyward.toml` > `~/.config/keyward/keyward.toml` > `/etc/keyward/keyward.toml`
//! with environment variable overrides via `KEYWARD_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::KeywardConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/keyward/keyward.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "keyward.toml";

/// The user's XDG config file, if a config directory exists on this platform.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("keyward").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/keyward/keyward.toml` (system-wide)
/// 3. `~/.config/keyward/keyward.toml` (user XDG config)
/// 4. `./keyward.toml` (local directory)
/// 5. `KEYWARD_*` environment variables
pub fn load_config() -> Result<KeywardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KeywardConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<KeywardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KeywardConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
///
/// Used for the `--config` flag: the XDG hierarchy is skipped entirely.
pub fn load_config_from_path(path: &Path) -> Result<KeywardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KeywardConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `KEYWARD_VAULT_KDF_MEMORY_COST` must map to
/// `vault.kdf_memory_cost`, not `vault.kdf.memory.cost`.
fn env_provider() -> Env {
    // KEYWARD_VAULT_KEY carries the passphrase for non-interactive commands and
    // is not a config key.
    Env::prefixed("KEYWARD_")
        .ignore(&["vault_key"])
        .map(|key| {
            let mapped = key
                .as_str()
                .replacen("vault_", "vault.", 1)
                .replacen("search_", "search.", 1)
                .replacen("ui_", "ui.", 1)
                .replacen("logging_", "logging.", 1);
            mapped.into()
        })
}
