// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interaction state machine for keyward.
//!
//! Presentation translates key presses into [`Action`]s, hands them to a
//! [`Session`], and draws the resulting [`SessionView`]. The session keeps the
//! vault file, the credential collection, and the search index consistent.

pub mod controller;
pub mod form;
pub mod mode;
pub mod notification;
pub mod selection;
pub mod view;

pub use controller::Session;
pub use form::{Draft, DraftTarget, Field, PassphraseForm};
pub use mode::{Action, Effect, Mode, Screen, Transition, transition};
pub use notification::{Level, Notification, Notifier};
pub use selection::{Direction, Selection};
pub use view::{Detail, PassphraseView, ResultRow, SessionView};
