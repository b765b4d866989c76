// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tracing subscriber setup.
//!
//! The terminal belongs to the UI, so events go to the configured log file.

use std::path::Path;

use keyward_config::LoggingConfig;
use keyward_core::KeywardError;
use tracing_appender::non_blocking::WorkerGuard;

/// Default filter when `RUST_LOG` is unset.
pub fn default_directives(level: &str) -> String {
    format!("keyward={},warn", level.to_lowercase())
}

/// Install the global subscriber writing to `config.file`.
///
/// Keep the returned guard alive until exit; dropping it flushes the writer.
pub fn init_tracing(config: &LoggingConfig) -> Result<WorkerGuard, KeywardError> {
    use tracing_subscriber::EnvFilter;

    let file_name = config.file.file_name().ok_or_else(|| {
        KeywardError::Config(format!(
            "logging.file has no file name: {}",
            config.file.display()
        ))
    })?;
    let dir = config
        .file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)
        .map_err(|e| KeywardError::io("failed to create log directory", dir, e))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(false)
        .try_init()
        .map_err(|e| KeywardError::Internal(format!("failed to install tracing subscriber: {e}")))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_scope_level_to_keyward() {
        assert_eq!(default_directives("DEBUG"), "keyward=debug,warn");
    }

    #[test]
    fn missing_file_name_is_a_config_error() {
        let config = LoggingConfig {
            file: "/".into(),
            ..LoggingConfig::default()
        };
        assert!(matches!(init_tracing(&config), Err(KeywardError::Config(_))));
    }
}
