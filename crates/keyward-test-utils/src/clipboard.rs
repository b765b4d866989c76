// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording clipboard for deterministic tests.

use keyward_core::{Clipboard, KeywardError};

/// A clipboard that keeps every copied string.
#[derive(Debug, Default)]
pub struct RecordingClipboard {
    copies: Vec<String>,
    fail: bool,
}

impl RecordingClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose every copy fails.
    pub fn failing() -> Self {
        Self {
            copies: Vec::new(),
            fail: true,
        }
    }

    /// Everything copied so far, oldest first.
    pub fn copies(&self) -> &[String] {
        &self.copies
    }

    pub fn last(&self) -> Option<&str> {
        self.copies.last().map(String::as_str)
    }
}

impl Clipboard for RecordingClipboard {
    fn copy(&mut self, text: &str) -> Result<(), KeywardError> {
        if self.fail {
            return Err(KeywardError::Clipboard("clipboard unavailable".into()));
        }
        tracing::debug!(len = text.len(), "recorded clipboard copy");
        self.copies.push(text.to_owned());
        Ok(())
    }
}
