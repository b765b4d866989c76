// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Screens, modes, abstract input actions, and the mode transition table.
//!
//! [`transition`] is a pure function of the current mode and the incoming
//! action. Guards that depend on session data (for example, editing needs a
//! selected credential) are applied by the controller when it runs the effect.

use strum::Display;

use crate::selection::Direction;

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Screen {
    /// Passphrase entry before the vault is open.
    Entry,
    /// Vault open; modes apply.
    Unlocked,
    /// Collecting a new passphrase.
    ChangePassphrase,
}

/// Interaction mode while [`Screen::Unlocked`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Mode {
    #[default]
    Navigate,
    Search,
    Edit,
}

/// Abstract input produced by presentation after applying its key bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A character typed into whichever text field has focus.
    Type(char),
    /// Delete the last character of the focused text field.
    Erase,
    /// Enter: confirm search, copy, save, or submit a passphrase.
    Confirm,
    /// Escape: clear the query, discard an edit, or leave a screen.
    Back,
    /// Accept the query completion suggestion.
    Complete,
    Search,
    Move(Direction),
    Edit,
    New,
    Delete,
    NextField,
    PrevField,
    ChangePassphrase,
    Quit,
}

/// Side effect the controller performs for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    AppendQuery(char),
    EraseQuery,
    ClearQuery,
    CompleteQuery,
    Move(Direction),
    Copy,
    BeginEdit,
    BeginNew,
    Delete,
    AppendField(char),
    EraseField,
    FocusNext,
    FocusPrev,
    Save,
    Discard,
    OpenChangePassphrase,
    Quit,
}

/// Outcome of an action in a mode: the mode to enter and the effect to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: Mode,
    pub effect: Effect,
}

impl Transition {
    const fn to(next: Mode, effect: Effect) -> Self {
        Self { next, effect }
    }

    const fn stay(mode: Mode, effect: Effect) -> Self {
        Self::to(mode, effect)
    }
}

/// The mode transition table.
pub fn transition(mode: Mode, action: Action) -> Transition {
    use Action as A;
    use Effect as E;
    use Mode as M;

    match (mode, action) {
        (m, A::Quit) => Transition::stay(m, E::Quit),

        (M::Navigate, A::Search) => Transition::to(M::Search, E::None),
        (M::Navigate, A::Back) => Transition::stay(M::Navigate, E::ClearQuery),
        (M::Navigate, A::Move(d)) => Transition::stay(M::Navigate, E::Move(d)),
        (M::Navigate, A::Confirm) => Transition::stay(M::Navigate, E::Copy),
        (M::Navigate, A::Edit) => Transition::to(M::Edit, E::BeginEdit),
        (M::Navigate, A::New) => Transition::to(M::Edit, E::BeginNew),
        (M::Navigate, A::Delete) => Transition::stay(M::Navigate, E::Delete),
        (M::Navigate, A::ChangePassphrase) => {
            Transition::stay(M::Navigate, E::OpenChangePassphrase)
        }

        (M::Search, A::Type(c)) => Transition::stay(M::Search, E::AppendQuery(c)),
        (M::Search, A::Erase) => Transition::stay(M::Search, E::EraseQuery),
        (M::Search, A::Complete) => Transition::stay(M::Search, E::CompleteQuery),
        (M::Search, A::Confirm) => Transition::to(M::Navigate, E::None),

        (M::Edit, A::Type(c)) => Transition::stay(M::Edit, E::AppendField(c)),
        (M::Edit, A::Erase) => Transition::stay(M::Edit, E::EraseField),
        (M::Edit, A::NextField) => Transition::stay(M::Edit, E::FocusNext),
        (M::Edit, A::PrevField) => Transition::stay(M::Edit, E::FocusPrev),
        (M::Edit, A::Confirm) => Transition::to(M::Navigate, E::Save),
        (M::Edit, A::Back) => Transition::to(M::Navigate, E::Discard),

        (m, _) => Transition::stay(m, E::None),
    }
}
