// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for keyward.
//!
//! TOML files in the XDG hierarchy are merged with `KEYWARD_*` environment
//! overrides, rejected on unknown keys, and checked semantically. Failures are
//! reported as miette diagnostics with typo suggestions.
//!
//! ```no_run
//! use keyward_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("vault: {}", config.vault.path.display());
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{KeywardConfig, LoggingConfig, SearchConfig, UiConfig, VaultConfig};

/// Load configuration from the XDG hierarchy and validate it.
pub fn load_and_validate() -> Result<KeywardConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load configuration from an explicit file (the `--config` flag) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<KeywardConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        // Figment records file origins as absolute paths.
        let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        read_source(&absolute).into_iter().collect()
    })
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<KeywardConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Validate a loaded config, or turn the load failure into diagnostics.
///
/// Source files are only read when there is an error to point into.
fn finish(
    loaded: Result<KeywardConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<KeywardConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Read every TOML file of the standard hierarchy that exists.
fn collect_toml_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|d| d.join(loader::LOCAL_CONFIG_FILE))
        .unwrap_or_else(|_| loader::LOCAL_CONFIG_FILE.into());

    [
        Some(local),
        loader::user_config_path(),
        Some(loader::SYSTEM_CONFIG_PATH.into()),
    ]
    .into_iter()
    .flatten()
    .filter_map(|path| read_source(&path))
    .collect()
}

fn read_source(path: &Path) -> Option<(String, String)> {
    std::fs::read_to_string(path)
        .ok()
        .map(|content| (path.display().to_string(), content))
}
