// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for query behavior against a populated index.

use keyward_core::{Credential, CredentialCollection, CredentialId};
use keyward_search::SearchIndex;

fn populated(entries: &[(&str, &str)]) -> (SearchIndex, Vec<CredentialId>) {
    let ids: Vec<CredentialId> = entries.iter().map(|_| CredentialId::new()).collect();
    let collection: CredentialCollection = ids
        .iter()
        .zip(entries)
        .map(|(id, (s, u))| (*id, Credential::new(*s, *u, "secret")))
        .collect();
    let mut index = SearchIndex::open_in_memory(800).unwrap();
    index.rebuild(&collection).unwrap();
    (index, ids)
}

#[test]
fn blank_query_lists_all_by_source_case_insensitively() {
    let (index, ids) = populated(&[
        ("zeta", "u1"),
        ("Alpha", "u2"),
        ("beta", "u3"),
        ("ALPHA", "u4"),
    ]);

    let listed = index.query("   ").unwrap();
    assert_eq!(listed.len(), 4);
    assert_eq!(listed[2], ids[2]);
    assert_eq!(listed[3], ids[0]);

    // The two "alpha" entries tie on source and are ordered by id.
    let mut alphas = vec![ids[1], ids[3]];
    alphas.sort();
    assert_eq!(listed[..2], alphas[..]);

    assert_eq!(index.query("").unwrap(), listed);
}

#[test]
fn upsert_then_query_then_remove() {
    let mut index = SearchIndex::open_in_memory(800).unwrap();
    let id = CredentialId::new();

    index.upsert(&id, "GitHub", "alice").unwrap();
    assert!(index.query("git").unwrap().contains(&id));

    index.remove(&id).unwrap();
    assert!(!index.query("git").unwrap().contains(&id));
}

#[test]
fn prefix_substring_and_fuzzy_matches() {
    let (index, ids) = populated(&[("Example Bank", "robert"), ("GitHub", "alice")]);

    assert_eq!(index.query("exam").unwrap(), vec![ids[0]]);
    assert_eq!(index.query("xamp").unwrap(), vec![ids[0]]);
    assert_eq!(index.query("exmaple").unwrap(), vec![ids[0]]);
    assert_eq!(index.query("Hub").unwrap(), vec![ids[1]]);
}

#[test]
fn usernames_are_searchable() {
    let (index, ids) = populated(&[("Mail", "carol.smith"), ("Bank", "dave")]);
    assert_eq!(index.query("carol").unwrap(), vec![ids[0]]);
}

#[test]
fn punctuated_usernames_match_as_a_whole() {
    let (index, ids) = populated(&[("Corp", "john_doe"), ("Mail", "carol.smith")]);

    assert_eq!(index.query("john_doe").unwrap(), vec![ids[0]]);
    assert_eq!(index.query("carol.smith").unwrap(), vec![ids[1]]);
    assert_eq!(index.query("n_d").unwrap(), vec![ids[0]]);
    assert_eq!(index.query("l.sm").unwrap(), vec![ids[1]]);
    assert_eq!(index.query("smith").unwrap(), vec![ids[1]]);
}

#[test]
fn email_usernames_match_across_the_at_sign() {
    let (index, ids) = populated(&[("Shop", "dave@example.com"), ("Forum", "dave-b")]);

    assert_eq!(index.query("dave@example").unwrap(), vec![ids[0]]);
    assert_eq!(index.query("dave-b").unwrap(), vec![ids[1]]);
}

#[test]
fn multi_word_query_unions_words() {
    let (index, ids) = populated(&[("GitHub", "alice"), ("Example Bank", "bob"), ("Mail", "carol")]);
    let hits = index.query("github bank").unwrap();
    assert_eq!(hits.len(), 2);
    assert!(hits.contains(&ids[0]));
    assert!(hits.contains(&ids[1]));
}

#[test]
fn results_are_deduplicated() {
    let (index, ids) = populated(&[("GitHub", "github")]);
    assert_eq!(index.query("git").unwrap(), vec![ids[0]]);
}

#[test]
fn ids_mirror_the_collection() {
    let (index, ids) = populated(&[("a source", "x1"), ("b source", "x2")]);
    let indexed = index.ids().unwrap();
    assert_eq!(indexed.len(), 2);
    assert!(ids.iter().all(|id| indexed.contains(id)));
}
