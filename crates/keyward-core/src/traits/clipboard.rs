// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Clipboard collaborator trait.

use crate::error::KeywardError;

/// Writes plaintext to the system clipboard.
///
/// Implementations must not retain the text beyond what the platform
/// clipboard itself requires.
pub trait Clipboard {
    /// Replace the clipboard contents with `text`.
    fn copy(&mut self, text: &str) -> Result<(), KeywardError>;
}

impl<C: Clipboard + ?Sized> Clipboard for Box<C> {
    fn copy(&mut self, text: &str) -> Result<(), KeywardError> {
        (**self).copy(text)
    }
}
