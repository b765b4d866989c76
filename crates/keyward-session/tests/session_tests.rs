// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end session tests against a real vault file and index.

use std::collections::BTreeSet;

use keyward_core::{Clipboard, CredentialId};
use keyward_search::SearchIndex;
use keyward_search::index::INDEX_FILE;
use keyward_session::{Action, Direction, Level, Mode, Screen, Session};
use keyward_test_utils::{RecordingClipboard, TestHarness};
use tracing_test::traced_test;

fn type_str<C: Clipboard>(session: &mut Session<C>, text: &str) {
    for c in text.chars() {
        session.handle(Action::Type(c)).unwrap();
    }
}

/// Submit `passphrase` on the entry screen, twice when creating a vault.
fn unlock_with<C: Clipboard>(session: &mut Session<C>, passphrase: &str) {
    let creating = session.view().passphrase.new_vault;
    type_str(session, passphrase);
    session.handle(Action::Confirm).unwrap();
    if creating {
        type_str(session, passphrase);
        session.handle(Action::Confirm).unwrap();
    }
}

fn open(harness: &TestHarness, passphrase: &str) -> Session<RecordingClipboard> {
    let mut session = Session::new(harness.config(), RecordingClipboard::new()).unwrap();
    unlock_with(&mut session, passphrase);
    assert_eq!(session.screen(), Screen::Unlocked);
    session
}

fn add<C: Clipboard>(session: &mut Session<C>, source: &str, username: &str, password: &str) {
    session.handle(Action::New).unwrap();
    type_str(session, source);
    session.handle(Action::NextField).unwrap();
    type_str(session, username);
    session.handle(Action::NextField).unwrap();
    type_str(session, password);
    session.handle(Action::Confirm).unwrap();
    assert_eq!(session.mode(), Mode::Navigate);
}

/// Put a directory where the vault file lives so the atomic rename fails.
/// Returns the vault bytes it displaced.
fn block_vault_writes(harness: &TestHarness) -> Vec<u8> {
    let bytes = harness.vault_bytes().unwrap();
    std::fs::remove_file(harness.vault_path()).unwrap();
    std::fs::create_dir(harness.vault_path()).unwrap();
    bytes
}

/// Undo [`block_vault_writes`], checking nothing was written in the meantime.
fn unblock_vault_writes(harness: &TestHarness, bytes: &[u8]) {
    let leftovers = std::fs::read_dir(harness.vault_path()).unwrap().count();
    assert_eq!(leftovers, 0);
    std::fs::remove_dir(harness.vault_path()).unwrap();
    std::fs::write(harness.vault_path(), bytes).unwrap();
}

fn indexed_ids(harness: &TestHarness) -> BTreeSet<CredentialId> {
    let index = SearchIndex::open_at(&harness.index_dir().join(INDEX_FILE), 800).unwrap();
    let ids = index.ids().unwrap();
    index.close().unwrap();
    ids
}

fn search<C: Clipboard>(session: &mut Session<C>, query: &str) {
    session.handle(Action::Search).unwrap();
    type_str(session, query);
    session.handle(Action::Confirm).unwrap();
    assert_eq!(session.mode(), Mode::Navigate);
}

#[test]
fn create_save_query_copy_delete() {
    let harness = TestHarness::new().unwrap();
    let mut session = open(&harness, "P1");
    assert!(harness.vault_bytes().is_some());

    add(&mut session, "Example", "bob", "p@ss");
    assert_eq!(session.notification().unwrap().message, "Credentials saved");
    let id = *session.collection().unwrap().ids().next().unwrap();

    search(&mut session, "exam");
    assert_eq!(session.query(), "exam");
    assert_eq!(session.results(), [id]);

    session.handle(Action::Confirm).unwrap();
    assert_eq!(session.clipboard().last(), Some("p@ss"));
    assert_eq!(session.notification().unwrap().message, "Credentials copied");

    session.handle(Action::Delete).unwrap();
    assert!(session.results().is_empty());
    assert!(session.collection().unwrap().is_empty());
    session.close().unwrap();

    // The deletion is durable.
    let session = open(&harness, "P1");
    assert!(session.collection().unwrap().is_empty());
}

#[test]
fn wrong_passphrase_stays_on_entry() {
    let harness = TestHarness::new().unwrap();
    let mut session = open(&harness, "right");
    add(&mut session, "GitHub", "alice", "hunter2");
    session.close().unwrap();
    let before = harness.vault_bytes().unwrap();

    let mut session = Session::new(harness.config(), RecordingClipboard::new()).unwrap();
    assert!(!session.view().passphrase.new_vault);
    type_str(&mut session, "wrong");
    session.handle(Action::Confirm).unwrap();

    assert_eq!(session.screen(), Screen::Entry);
    assert!(session.collection().is_none());
    let notification = session.notification().unwrap();
    assert_eq!(notification.message, "Incorrect passphrase");
    assert_eq!(notification.level, Level::Error);
    assert_eq!(session.view().passphrase.first_len, 0);
    assert_eq!(harness.vault_bytes().unwrap(), before);

    type_str(&mut session, "right");
    session.handle(Action::Confirm).unwrap();
    assert_eq!(session.screen(), Screen::Unlocked);
    assert_eq!(session.collection().unwrap().len(), 1);
}

#[test]
fn change_passphrase_then_relaunch() {
    let harness = TestHarness::new().unwrap();
    let mut session = open(&harness, "P1");
    add(&mut session, "GitHub", "alice", "hunter2");
    add(&mut session, "Mail", "carol", "letmein");
    let expected = session.collection().unwrap().clone();

    session.handle(Action::ChangePassphrase).unwrap();
    assert_eq!(session.screen(), Screen::ChangePassphrase);
    type_str(&mut session, "P2");
    session.handle(Action::Confirm).unwrap();
    type_str(&mut session, "P2");
    session.handle(Action::Confirm).unwrap();
    assert_eq!(session.screen(), Screen::Unlocked);
    assert_eq!(session.notification().unwrap().message, "Passphrase changed");
    session.close().unwrap();

    let mut relaunched = Session::new(harness.config(), RecordingClipboard::new()).unwrap();
    unlock_with(&mut relaunched, "P1");
    assert_eq!(relaunched.screen(), Screen::Entry);

    unlock_with(&mut relaunched, "P2");
    assert_eq!(relaunched.screen(), Screen::Unlocked);
    assert_eq!(relaunched.collection().unwrap(), &expected);
}

#[test]
fn change_passphrase_mismatch_leaves_vault_alone() {
    let harness = TestHarness::new().unwrap();
    let mut session = open(&harness, "P1");
    add(&mut session, "GitHub", "alice", "hunter2");
    let before = harness.vault_bytes().unwrap();

    session.handle(Action::ChangePassphrase).unwrap();
    type_str(&mut session, "P2");
    session.handle(Action::Confirm).unwrap();
    type_str(&mut session, "P3");
    session.handle(Action::Confirm).unwrap();

    assert_eq!(session.screen(), Screen::ChangePassphrase);
    assert!(!session.view().passphrase.confirming);
    assert_eq!(session.notification().unwrap().message, "Passphrases do not match");
    assert_eq!(harness.vault_bytes().unwrap(), before);

    session.handle(Action::Back).unwrap();
    assert_eq!(session.screen(), Screen::Unlocked);
}

#[test]
fn only_the_newest_notification_clear_applies() {
    let harness = TestHarness::new().unwrap();
    let mut session = open(&harness, "pw");
    add(&mut session, "GitHub", "alice", "hunter2");

    session.handle(Action::Confirm).unwrap();
    let (first, _) = session.pending_clear().unwrap();
    session.handle(Action::Confirm).unwrap();
    let (second, _) = session.pending_clear().unwrap();
    assert!(second > first);

    assert!(!session.clear_notification(first));
    assert!(session.notification().is_some());
    assert!(session.clear_notification(second));
    assert!(session.notification().is_none());
}

#[test]
fn clipboard_failure_is_a_notification() {
    let harness = TestHarness::new().unwrap();
    let mut session = Session::new(harness.config(), RecordingClipboard::failing()).unwrap();
    unlock_with(&mut session, "pw");
    add(&mut session, "GitHub", "alice", "hunter2");

    session.handle(Action::Confirm).unwrap();
    let notification = session.notification().unwrap();
    assert_eq!(notification.level, Level::Error);
    assert!(notification.message.starts_with("Copy failed"));
    assert_eq!(session.screen(), Screen::Unlocked);
}

#[test]
fn copy_and_delete_without_selection_are_no_ops() {
    let harness = TestHarness::new().unwrap();
    let mut session = open(&harness, "pw");
    let before = harness.vault_bytes().unwrap();
    let generation = session.pending_clear().map(|(g, _)| g);

    session.handle(Action::Confirm).unwrap();
    session.handle(Action::Delete).unwrap();

    assert!(session.clipboard().copies().is_empty());
    assert_eq!(session.pending_clear().map(|(g, _)| g), generation);
    assert_eq!(harness.vault_bytes().unwrap(), before);
}

#[test]
fn paging_moves_between_pages() {
    let harness = TestHarness::new().unwrap().with_page_size(2);
    let mut session = open(&harness, "pw");
    for source in ["a", "b", "c", "d", "e"] {
        add(&mut session, source, "user", "pw");
    }

    let view = session.view();
    assert_eq!((view.page, view.pages, view.rows.len()), (0, 3, 2));

    session.handle(Action::Move(Direction::Down)).unwrap();
    session.handle(Action::Move(Direction::Right)).unwrap();
    session.handle(Action::Move(Direction::Right)).unwrap();
    session.handle(Action::Move(Direction::Right)).unwrap();
    let view = session.view();
    assert_eq!(view.page, 2);
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.selected_row().unwrap().source, "e");

    session.handle(Action::Move(Direction::Down)).unwrap();
    assert_eq!(session.selection().position(), 0);

    // Refreshing the results resets the cursor.
    search(&mut session, "a");
    assert_eq!((session.selection().page(), session.selection().position()), (0, 0));
}

#[test]
fn clear_restores_the_full_listing() {
    let harness = TestHarness::new().unwrap();
    let mut session = open(&harness, "pw");
    add(&mut session, "GitHub", "alice", "x");
    add(&mut session, "Mail", "carol", "y");

    search(&mut session, "github");
    assert_eq!(session.results().len(), 1);
    session.handle(Action::Back).unwrap();
    assert_eq!(session.query(), "");
    assert_eq!(session.results().len(), 2);
}

#[test]
fn completion_extends_the_query() {
    let harness = TestHarness::new().unwrap();
    let mut session = open(&harness, "pw");
    add(&mut session, "GitHub", "alice", "x");
    add(&mut session, "Mail", "carol", "y");
    assert_eq!(session.suggestions(), ["GitHub", "Mail", "alice", "carol"]);

    session.handle(Action::Search).unwrap();
    type_str(&mut session, "gi");
    assert_eq!(session.completion(), Some("GitHub"));
    session.handle(Action::Complete).unwrap();
    assert_eq!(session.query(), "GitHub");
    assert_eq!(session.results().len(), 1);
}

#[test]
fn edit_view_shows_masked_draft() {
    let harness = TestHarness::new().unwrap();
    let mut session = open(&harness, "pw");
    add(&mut session, "GitHub", "alice", "hunter2");

    session.handle(Action::Edit).unwrap();
    assert_eq!(session.mode(), Mode::Edit);
    session.handle(Action::NextField).unwrap();
    type_str(&mut session, "2");

    let view = session.view();
    let detail = view.detail.unwrap();
    assert_eq!(detail.username, "alice2");
    assert_eq!(detail.password_len, 7);
    assert!(!detail.is_new);
    assert!(!format!("{:?}", session.view()).contains("hunter2"));
}

#[test]
fn stale_persisted_index_is_rebuilt() {
    let harness = TestHarness::new().unwrap();
    let mut session = open(&harness, "pw");
    add(&mut session, "GitHub", "alice", "x");
    add(&mut session, "Mail", "carol", "y");
    let ids: Vec<CredentialId> = session.collection().unwrap().ids().copied().collect();
    session.close().unwrap();

    {
        let mut index = SearchIndex::open_at(&harness.index_dir().join(INDEX_FILE), 800).unwrap();
        index.remove(&ids[0]).unwrap();
        index.close().unwrap();
    }

    let session = open(&harness, "pw");
    assert_eq!(session.results().len(), 2);
}

#[test]
fn failed_delete_changes_nothing() {
    let harness = TestHarness::new().unwrap();
    let mut session = open(&harness, "pw");
    add(&mut session, "GitHub", "alice", "x");
    let collection = session.collection().unwrap().clone();
    let results = session.results().to_vec();

    let bytes = block_vault_writes(&harness);
    assert!(session.handle(Action::Delete).is_err());
    assert_eq!(session.collection(), Some(&collection));
    assert_eq!(session.results(), results);
    session.close().unwrap();
    assert_eq!(indexed_ids(&harness), collection.ids().copied().collect());
    unblock_vault_writes(&harness, &bytes);

    let session = open(&harness, "pw");
    assert_eq!(session.collection(), Some(&collection));
}

#[test]
fn failed_save_changes_nothing() {
    let harness = TestHarness::new().unwrap();
    let mut session = open(&harness, "pw");
    add(&mut session, "GitHub", "alice", "x");
    let collection = session.collection().unwrap().clone();
    let results = session.results().to_vec();

    let bytes = block_vault_writes(&harness);
    session.handle(Action::New).unwrap();
    type_str(&mut session, "Mail");
    session.handle(Action::NextField).unwrap();
    type_str(&mut session, "carol");
    assert!(session.handle(Action::Confirm).is_err());
    assert_eq!(session.collection(), Some(&collection));
    assert_eq!(session.results(), results);
    session.close().unwrap();
    assert_eq!(indexed_ids(&harness), collection.ids().copied().collect());
    unblock_vault_writes(&harness, &bytes);

    let session = open(&harness, "pw");
    assert_eq!(session.collection(), Some(&collection));
}

#[test]
fn failed_passphrase_change_keeps_the_old_key() {
    let harness = TestHarness::new().unwrap();
    let mut session = open(&harness, "P1");
    add(&mut session, "GitHub", "alice", "x");
    let collection = session.collection().unwrap().clone();

    let bytes = block_vault_writes(&harness);
    session.handle(Action::ChangePassphrase).unwrap();
    type_str(&mut session, "P2");
    session.handle(Action::Confirm).unwrap();
    type_str(&mut session, "P2");
    assert!(session.handle(Action::Confirm).is_err());
    assert_eq!(session.collection(), Some(&collection));
    session.close().unwrap();
    unblock_vault_writes(&harness, &bytes);

    let session = open(&harness, "P1");
    assert_eq!(session.collection(), Some(&collection));
}

#[test]
fn memory_index_leaves_no_index_on_disk() {
    let harness = TestHarness::new().unwrap().with_memory_index();
    let mut session = open(&harness, "pw");
    add(&mut session, "GitHub", "alice", "x");
    assert_eq!(session.results().len(), 1);
    session.close().unwrap();
    assert!(!harness.index_dir().exists());
}

#[test]
fn quit_is_accepted_on_every_screen() {
    let harness = TestHarness::new().unwrap();
    let mut session = Session::new(harness.config(), RecordingClipboard::new()).unwrap();
    session.handle(Action::Quit).unwrap();
    assert!(session.should_quit());

    let mut session = open(&harness, "pw");
    session.handle(Action::ChangePassphrase).unwrap();
    session.handle(Action::Quit).unwrap();
    assert!(session.should_quit());
}

#[traced_test]
#[test]
fn unlock_logs_without_secrets() {
    let harness = TestHarness::new().unwrap();
    let mut session = open(&harness, "correct horse");
    add(&mut session, "GitHub", "alice", "hunter2");

    assert!(logs_contain("vault unlocked"));
    assert!(logs_contain("credential saved"));
    assert!(!logs_contain("hunter2"));
    assert!(!logs_contain("correct horse"));
}
