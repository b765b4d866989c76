// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Full-text search over credential sources and usernames.
//!
//! Backed by an SQLite FTS5 table, either persisted under the configured
//! index directory or held in memory. The index is a cache: the vault is the
//! source of truth and the index can always be rebuilt from it.

pub mod index;
pub mod terms;

pub use index::SearchIndex;
