// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for keyward.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type used across the vault, index, and session crates.
///
/// Only [`KeywardError::WrongPassphrase`] is recoverable at the session level;
/// every other variant terminates the process after logging.
#[derive(Debug, Error)]
pub enum KeywardError {
    /// Configuration errors (invalid TOML, failed validation).
    #[error("configuration error: {0}")]
    Config(String),

    /// The vault could not be authenticated under the derived key.
    #[error("incorrect passphrase")]
    WrongPassphrase,

    /// Ciphertext failed authentication (wrong key, truncated, or tampered).
    #[error("authentication failed -- wrong key or corrupted data")]
    AuthenticationFailed,

    /// Input too short or structurally invalid before any decryption was attempted.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Authenticated plaintext could not be decoded into a credential collection.
    #[error("vault is corrupt: {0}")]
    Corrupt(String),

    /// Key derivation, cipher setup, or randomness failures.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Filesystem failure while touching vault or index paths.
    #[error("{context} ({}): {source}", path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    /// Search index backend failure.
    #[error("search index error: {source}")]
    Index {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An operation was invoked in a state where it is not allowed.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// The clipboard collaborator rejected the copy.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl KeywardError {
    /// Convenience constructor for filesystem errors.
    pub fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }

    /// Whether the session can continue after this error (re-prompt the user).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::WrongPassphrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_wrong_passphrase_is_recoverable() {
        assert!(KeywardError::WrongPassphrase.is_recoverable());
        assert!(!KeywardError::AuthenticationFailed.is_recoverable());
        assert!(!KeywardError::Corrupt("bad json".into()).is_recoverable());
        assert!(!KeywardError::Precondition("no selection".into()).is_recoverable());
        assert!(
            !KeywardError::io("write vault", "/tmp/x", std::io::Error::other("disk full"))
                .is_recoverable()
        );
    }

    #[test]
    fn io_error_message_includes_path_and_context() {
        let err = KeywardError::io(
            "failed to write vault",
            "/tmp/vault.kw",
            std::io::Error::other("disk full"),
        );
        let msg = err.to_string();
        assert!(msg.contains("failed to write vault"));
        assert!(msg.contains("/tmp/vault.kw"));
        assert!(msg.contains("disk full"));
    }
}
