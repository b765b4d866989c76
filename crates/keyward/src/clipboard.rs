// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System clipboard backed by `arboard`.

use keyward_core::{Clipboard, KeywardError};

/// Opens the platform clipboard on first use so a headless session can still
/// browse the vault.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<(), KeywardError> {
        let clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()
                .map_err(|e| KeywardError::Clipboard(format!("failed to open clipboard: {e}")))?,
        };
        self.inner
            .insert(clipboard)
            .set_text(text)
            .map_err(|e| KeywardError::Clipboard(e.to_string()))
    }
}
