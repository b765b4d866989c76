// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the keyward configuration system.

use std::path::PathBuf;

use keyward_config::diagnostic::ConfigError;
use keyward_config::model::KeywardConfig;
use keyward_config::{load_and_validate_str, load_config_from_str};

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[vault]
path = "/tmp/keyward/vault.kw"
kdf_memory_cost = 16384
kdf_iterations = 2
kdf_parallelism = 1

[search]
index_dir = "/tmp/keyward/index"
persist_index = false
max_results = 50

[ui]
page_size = 5
notification_ms = 250

[logging]
level = "debug"
file = "/tmp/keyward/keyward.log"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.vault.path, PathBuf::from("/tmp/keyward/vault.kw"));
    assert_eq!(config.vault.kdf_memory_cost, 16384);
    assert_eq!(config.vault.kdf_iterations, 2);
    assert_eq!(config.vault.kdf_parallelism, 1);
    assert_eq!(config.search.index_dir, PathBuf::from("/tmp/keyward/index"));
    assert!(!config.search.persist_index);
    assert_eq!(config.search.max_results, 50);
    assert_eq!(config.ui.page_size, 5);
    assert_eq!(config.ui.notification_ms, 250);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn empty_toml_yields_defaults() {
    let config = load_config_from_str("").expect("empty TOML is valid");
    let defaults = KeywardConfig::default();
    assert_eq!(config.vault.path, defaults.vault.path);
    assert_eq!(config.vault.kdf_memory_cost, 65536);
    assert_eq!(config.vault.kdf_iterations, 3);
    assert_eq!(config.vault.kdf_parallelism, 4);
    assert!(config.search.persist_index);
    assert_eq!(config.search.max_results, 800);
    assert_eq!(config.ui.page_size, 10);
    assert_eq!(config.ui.notification_ms, 1000);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn partial_section_keeps_other_defaults() {
    let config = load_config_from_str("[ui]\npage_size = 3\n").unwrap();
    assert_eq!(config.ui.page_size, 3);
    assert_eq!(config.ui.notification_ms, 1000);
}

#[test]
fn typo_in_vault_section_suggests_correction() {
    let errors = load_and_validate_str("[vault]\npth = \"/tmp/v.kw\"\n").unwrap_err();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "pth");
            assert_eq!(suggestion.as_deref(), Some("path"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[sync]\nremote = \"x\"\n").unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::UnknownKey { key, .. } if key == "sync"))
    );
}

#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[ui]\npage_size = \"ten\"\n").unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.ends_with("page_size")))
    );
}

#[test]
fn semantic_errors_are_collected_together() {
    let toml = r#"
[vault]
kdf_memory_cost = 10

[ui]
page_size = 0

[logging]
level = "loud"
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 3);
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}

#[test]
fn valid_inline_config_passes_validation() {
    let config = load_and_validate_str("[search]\npersist_index = false\n").unwrap();
    assert!(!config.search.persist_index);
}
