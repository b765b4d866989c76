// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase acquisition for the non-interactive commands (`import`, `check`).
//!
//! The terminal UI collects passphrases through its own entry screen; these
//! helpers read `KEYWARD_VAULT_KEY` or fall back to a TTY prompt.

use std::io::IsTerminal;

use keyward_core::KeywardError;
use secrecy::{ExposeSecret, SecretString};

/// Environment variable that supplies the vault passphrase.
pub const VAULT_KEY_ENV_VAR: &str = "KEYWARD_VAULT_KEY";

/// Read the vault passphrase from the environment or the terminal.
pub fn get_vault_passphrase() -> Result<SecretString, KeywardError> {
    if let Some(key) = from_env() {
        return Ok(key);
    }
    if !std::io::stdin().is_terminal() {
        return Err(no_source());
    }
    let passphrase = read_tty("Vault passphrase: ")?;
    non_empty(passphrase)
}

/// Read a new passphrase, asking twice on a terminal.
///
/// The environment variable is taken as-is without confirmation.
pub fn get_vault_passphrase_with_confirm() -> Result<SecretString, KeywardError> {
    if let Some(key) = from_env() {
        return Ok(key);
    }
    if !std::io::stdin().is_terminal() {
        return Err(no_source());
    }
    let first = read_tty("New vault passphrase: ")?;
    let second = read_tty("Confirm vault passphrase: ")?;
    if first.expose_secret() != second.expose_secret() {
        return Err(KeywardError::Precondition("passphrases do not match".to_string()));
    }
    non_empty(first)
}

fn from_env() -> Option<SecretString> {
    std::env::var(VAULT_KEY_ENV_VAR)
        .ok()
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
}

fn read_tty(prompt: &str) -> Result<SecretString, KeywardError> {
    rpassword::prompt_password(prompt)
        .map(SecretString::from)
        .map_err(|e| KeywardError::Internal(format!("failed to read passphrase: {e}")))
}

fn non_empty(passphrase: SecretString) -> Result<SecretString, KeywardError> {
    if passphrase.expose_secret().is_empty() {
        return Err(KeywardError::Precondition(
            "empty passphrase not allowed".to_string(),
        ));
    }
    Ok(passphrase)
}

fn no_source() -> KeywardError {
    KeywardError::Precondition(format!(
        "no passphrase provided; set {VAULT_KEY_ENV_VAR} or run interactively"
    ))
}
