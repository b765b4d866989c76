// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only snapshot of session state for rendering.
//!
//! A view never carries a password in clear text; only its length.

use crate::form::Field;
use crate::mode::{Mode, Screen};
use crate::notification::Notification;

/// Everything presentation needs to draw one frame.
#[derive(Debug, Clone)]
pub struct SessionView<'a> {
    pub screen: Screen,
    pub mode: Mode,
    pub query: &'a str,
    /// Suggested completion of the query, if any.
    pub completion: Option<&'a str>,
    /// Results on the current page.
    pub rows: Vec<ResultRow<'a>>,
    pub total_results: usize,
    /// Zero-based page index.
    pub page: usize,
    pub pages: usize,
    pub detail: Option<Detail<'a>>,
    pub passphrase: PassphraseView,
    pub notification: Option<&'a Notification>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow<'a> {
    pub source: &'a str,
    pub username: &'a str,
    pub selected: bool,
}

/// The selected credential, or the draft while editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail<'a> {
    pub source: &'a str,
    pub username: &'a str,
    pub password_len: usize,
    /// Focused field while editing.
    pub focus: Option<Field>,
    /// True when the draft will create a new credential.
    pub is_new: bool,
}

/// Masked state of the passphrase form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassphraseView {
    /// No vault exists yet; the entry screen will create one.
    pub new_vault: bool,
    pub confirming: bool,
    pub first_len: usize,
    pub second_len: usize,
}

impl SessionView<'_> {
    /// The row under the cursor.
    pub fn selected_row(&self) -> Option<&ResultRow<'_>> {
        self.rows.iter().find(|row| row.selected)
    }
}
