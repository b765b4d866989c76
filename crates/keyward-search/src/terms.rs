// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Expansion of free-text queries into FTS5 match expressions.
//!
//! FTS5 only matches whole tokens (or token prefixes), so fuzzy and substring
//! matching happen here: every word of the query is compared against the
//! index vocabulary and the matching terms are OR-ed together.

/// Maximum Levenshtein distance for a fuzzy term match.
pub const MAX_EDIT_DISTANCE: usize = 2;

/// Whether vocabulary `term` matches query `word`.
///
/// `term` is already lower-cased by the tokenizer. Substring matching runs on
/// the lower-cased word and covers prefix matches. Edit distance runs on the
/// word as typed.
pub fn term_matches(term: &str, word: &str) -> bool {
    let lowered = word.to_lowercase();
    term.contains(&lowered) || strsim::levenshtein(term, word) <= MAX_EDIT_DISTANCE
}

/// Vocabulary terms matching any word of `query`, in vocabulary order.
pub fn matching_terms<'a>(query: &str, vocabulary: &'a [String]) -> Vec<&'a str> {
    let words: Vec<&str> = query.split_whitespace().collect();
    vocabulary
        .iter()
        .filter(|term| words.iter().any(|word| term_matches(term, word)))
        .map(String::as_str)
        .collect()
}

/// Build an FTS5 expression matching any of `terms`.
///
/// Returns `None` when there is nothing to match.
pub fn match_expression(terms: &[&str]) -> Option<String> {
    if terms.is_empty() {
        return None;
    }
    let quoted: Vec<String> = terms
        .iter()
        .map(|t| format!("\"{}\"", t.replace('"', "\"\"")))
        .collect();
    Some(quoted.join(" OR "))
}
