// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text buffers for the credential editor and the passphrase screens.
//!
//! All buffers are wiped from memory when dropped or cleared.

use keyward_core::{Credential, CredentialId};
use secrecy::SecretString;
use strum::Display;
use zeroize::{Zeroize, Zeroizing};

/// Field of the credential editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Field {
    #[default]
    Source,
    Username,
    Password,
}

impl Field {
    pub fn next(self) -> Self {
        match self {
            Self::Source => Self::Username,
            Self::Username => Self::Password,
            Self::Password => Self::Source,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Source => Self::Password,
            Self::Username => Self::Source,
            Self::Password => Self::Username,
        }
    }
}

/// Which credential a draft will be saved as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftTarget {
    /// A new credential under a freshly minted id.
    New(CredentialId),
    /// Replace the credential with this id.
    Existing(CredentialId),
}

impl DraftTarget {
    pub fn id(&self) -> CredentialId {
        match self {
            Self::New(id) | Self::Existing(id) => *id,
        }
    }
}

/// Credential being created or edited.
#[derive(Debug)]
pub struct Draft {
    target: DraftTarget,
    fields: Credential,
    focus: Field,
}

impl Draft {
    /// An empty draft for a new credential.
    pub fn new() -> Self {
        Self {
            target: DraftTarget::New(CredentialId::new()),
            fields: Credential::default(),
            focus: Field::Source,
        }
    }

    /// A draft pre-filled from an existing credential.
    pub fn editing(id: CredentialId, current: &Credential) -> Self {
        Self {
            target: DraftTarget::Existing(id),
            fields: current.clone(),
            focus: Field::Source,
        }
    }

    pub fn target(&self) -> DraftTarget {
        self.target
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn fields(&self) -> &Credential {
        &self.fields
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn push(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    pub fn pop(&mut self) {
        self.focused_mut().pop();
    }

    /// The credential to persist.
    pub fn to_credential(&self) -> Credential {
        self.fields.clone()
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Source => &mut self.fields.source,
            Field::Username => &mut self.fields.username,
            Field::Password => &mut self.fields.password,
        }
    }
}

impl Default for Draft {
    fn default() -> Self {
        Self::new()
    }
}

/// Passphrase with optional confirmation, as typed.
#[derive(Default)]
pub struct PassphraseForm {
    first: Zeroizing<String>,
    second: Zeroizing<String>,
    confirming: bool,
}

impl PassphraseForm {
    /// True once the first entry was accepted and the confirmation is being typed.
    pub fn confirming(&self) -> bool {
        self.confirming
    }

    pub fn first_len(&self) -> usize {
        self.first.chars().count()
    }

    pub fn second_len(&self) -> usize {
        self.second.chars().count()
    }

    pub fn first_is_empty(&self) -> bool {
        self.first.is_empty()
    }

    pub fn second_is_empty(&self) -> bool {
        self.second.is_empty()
    }

    pub fn push(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    pub fn pop(&mut self) {
        self.focused_mut().pop();
    }

    /// Move focus to the confirmation field.
    pub fn begin_confirm(&mut self) {
        self.confirming = true;
    }

    pub fn matches(&self) -> bool {
        *self.first == *self.second
    }

    /// The first entry as a secret.
    pub fn secret(&self) -> SecretString {
        SecretString::from(self.first.as_str().to_owned())
    }

    /// Wipe both fields and return focus to the first.
    pub fn reset(&mut self) {
        self.first.zeroize();
        self.second.zeroize();
        self.confirming = false;
    }

    /// Wipe only the first field (wrong passphrase on an existing vault).
    pub fn clear_first(&mut self) {
        self.first.zeroize();
    }

    fn focused_mut(&mut self) -> &mut String {
        if self.confirming {
            &mut self.second
        } else {
            &mut self.first
        }
    }
}

impl std::fmt::Debug for PassphraseForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassphraseForm")
            .field("first", &"[REDACTED]")
            .field("second", &"[REDACTED]")
            .field("confirming", &self.confirming)
            .finish()
    }
}
