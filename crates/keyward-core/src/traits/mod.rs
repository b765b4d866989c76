// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator seams implemented outside the core crates.

pub mod clipboard;

pub use clipboard::Clipboard;
