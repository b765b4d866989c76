// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for keyward integration tests.
//!
//! # Components
//!
//! - [`TestHarness`] - Temporary directory with a fast, isolated configuration
//! - [`RecordingClipboard`] - Clipboard that records copies and can be told to fail

pub mod clipboard;
pub mod harness;

pub use clipboard::RecordingClipboard;
pub use harness::TestHarness;
