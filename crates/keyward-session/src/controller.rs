// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The session controller.
//!
//! A [`Session`] owns the canonical credential collection, the vault store,
//! the search index, and all interaction state. Presentation feeds it
//! [`Action`]s and renders [`SessionView`] snapshots; it never touches the
//! vault or the index directly.
//!
//! Every mutation is written to the vault file first. Only after the write
//! succeeds does the in-memory collection change and the index follow, so a
//! failed write leaves both exactly as they were.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use keyward_config::KeywardConfig;
use keyward_core::{Clipboard, Credential, CredentialCollection, CredentialId, KeywardError};
use keyward_search::SearchIndex;
use keyward_vault::{KdfParams, VaultKey, VaultStore, derive_key};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::form::{Draft, DraftTarget, PassphraseForm};
use crate::mode::{Action, Effect, Mode, Screen, Transition, transition};
use crate::notification::{Level, Notification, Notifier};
use crate::selection::Selection;
use crate::view::{Detail, PassphraseView, ResultRow, SessionView};

/// State that only exists once the vault is unlocked.
struct OpenVault {
    collection: CredentialCollection,
    key: VaultKey,
    index: SearchIndex,
}

/// One interactive session over a vault.
pub struct Session<C> {
    config: KeywardConfig,
    store: VaultStore,
    clipboard: C,
    vault: Option<OpenVault>,
    new_vault: bool,
    screen: Screen,
    mode: Mode,
    query: String,
    results: Vec<CredentialId>,
    selection: Selection,
    draft: Option<Draft>,
    passphrase: PassphraseForm,
    notifier: Notifier,
    quit: bool,
}

fn not_unlocked() -> KeywardError {
    KeywardError::Precondition("vault is not unlocked".into())
}

impl<C: Clipboard> Session<C> {
    /// Start a session on the entry screen.
    pub fn new(config: KeywardConfig, clipboard: C) -> Result<Self, KeywardError> {
        let store = VaultStore::new(config.vault.path.clone());
        let new_vault = !store.exists()?;
        let selection = Selection::new(config.ui.page_size);
        let notifier = Notifier::new(Duration::from_millis(config.ui.notification_ms));
        debug!(path = %store.path().display(), new_vault, "session started");
        Ok(Self {
            config,
            store,
            clipboard,
            vault: None,
            new_vault,
            screen: Screen::Entry,
            mode: Mode::Navigate,
            query: String::new(),
            results: Vec::new(),
            selection,
            draft: None,
            passphrase: PassphraseForm::default(),
            notifier,
            quit: false,
        })
    }

    /// Apply one action.
    ///
    /// User mistakes (wrong passphrase, mismatched confirmation, a failed
    /// clipboard copy) become notifications. An `Err` means the session
    /// cannot continue safely.
    pub fn handle(&mut self, action: Action) -> Result<(), KeywardError> {
        if action == Action::Quit {
            self.quit = true;
            return Ok(());
        }
        let now = Instant::now();
        match self.screen {
            Screen::Entry => self.handle_entry(action, now),
            Screen::ChangePassphrase => self.handle_change_passphrase(action, now),
            Screen::Unlocked => {
                let Transition { next, effect } = transition(self.mode, action);
                if self.run(effect, now)? {
                    self.mode = next;
                }
                Ok(())
            }
        }
    }

    /// Deliver an expiry for notification `generation`.
    pub fn clear_notification(&mut self, generation: u64) -> bool {
        self.notifier.clear(generation)
    }

    /// Generation and deadline of the pending notification clear.
    pub fn pending_clear(&self) -> Option<(u64, Instant)> {
        self.notifier.pending_clear()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notifier.current()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[CredentialId] {
        &self.results
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    /// The canonical collection, once unlocked.
    pub fn collection(&self) -> Option<&CredentialCollection> {
        self.vault.as_ref().map(|v| &v.collection)
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// The selected result and its credential.
    pub fn selected(&self) -> Option<(CredentialId, &Credential)> {
        let id = *self.selection.selected(&self.results)?;
        let vault = self.vault.as_ref()?;
        vault.collection.get(&id).map(|c| (id, c))
    }

    /// Distinct sources and usernames, sorted, for query completion.
    pub fn suggestions(&self) -> Vec<&str> {
        let Some(vault) = self.vault.as_ref() else {
            return Vec::new();
        };
        let words: BTreeSet<&str> = vault
            .collection
            .iter()
            .flat_map(|(_, c)| [c.source.as_str(), c.username.as_str()])
            .filter(|s| !s.is_empty())
            .collect();
        words.into_iter().collect()
    }

    /// First suggestion that extends the current query, ignoring case.
    pub fn completion(&self) -> Option<&str> {
        if self.query.is_empty() {
            return None;
        }
        let prefix = self.query.to_lowercase();
        self.suggestions().into_iter().find(|s| {
            let lower = s.to_lowercase();
            lower.starts_with(&prefix) && lower != prefix
        })
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> SessionView<'_> {
        let total = self.results.len();
        let bounds = self.selection.page_bounds(total);
        let rows = self.vault.as_ref().map_or_else(Vec::new, |vault| {
            self.results[bounds]
                .iter()
                .enumerate()
                .filter_map(|(offset, id)| {
                    vault.collection.get(id).map(|c| ResultRow {
                        source: &c.source,
                        username: &c.username,
                        selected: offset == self.selection.position(),
                    })
                })
                .collect()
        });

        let detail = match (&self.draft, self.mode) {
            (Some(draft), Mode::Edit) => {
                let fields = draft.fields();
                Some(Detail {
                    source: &fields.source,
                    username: &fields.username,
                    password_len: fields.password.chars().count(),
                    focus: Some(draft.focus()),
                    is_new: matches!(draft.target(), DraftTarget::New(_)),
                })
            }
            _ => self.selected().map(|(_, c)| Detail {
                source: &c.source,
                username: &c.username,
                password_len: c.password.chars().count(),
                focus: None,
                is_new: false,
            }),
        };

        SessionView {
            screen: self.screen,
            mode: self.mode,
            query: &self.query,
            completion: self.completion(),
            rows,
            total_results: total,
            page: self.selection.page(),
            pages: self.selection.pages(total),
            detail,
            passphrase: PassphraseView {
                new_vault: self.new_vault,
                confirming: self.passphrase.confirming(),
                first_len: self.passphrase.first_len(),
                second_len: self.passphrase.second_len(),
            },
            notification: self.notifier.current(),
        }
    }

    /// End the session, closing the index.
    pub fn close(self) -> Result<(), KeywardError> {
        if let Some(vault) = self.vault {
            vault.index.close()?;
        }
        Ok(())
    }

    fn notify(&mut self, message: impl Into<String>, level: Level, now: Instant) {
        self.notifier.show(message, level, now);
    }

    // Entry screen

    fn handle_entry(&mut self, action: Action, now: Instant) -> Result<(), KeywardError> {
        match action {
            Action::Type(c) => self.passphrase.push(c),
            Action::Erase => self.passphrase.pop(),
            Action::Back if self.passphrase.confirming() => self.passphrase.reset(),
            Action::Confirm => self.submit_entry(now)?,
            _ => {}
        }
        Ok(())
    }

    fn submit_entry(&mut self, now: Instant) -> Result<(), KeywardError> {
        if !self.passphrase.confirming() {
            if self.passphrase.first_is_empty() {
                return Ok(());
            }
            let Some(params) = self.store.kdf_params()? else {
                self.new_vault = true;
                self.passphrase.begin_confirm();
                return Ok(());
            };
            let key = derive_key(&self.passphrase.secret(), params)?;
            return match self.store.read(&key) {
                Ok(collection) => self.unlock(key, collection),
                Err(e) if e.is_recoverable() => {
                    warn!(path = %self.store.path().display(), "unlock failed: incorrect passphrase");
                    self.passphrase.clear_first();
                    self.notify("Incorrect passphrase", Level::Error, now);
                    Ok(())
                }
                Err(e) => Err(e),
            };
        }

        if self.passphrase.second_is_empty() {
            return Ok(());
        }
        if !self.passphrase.matches() {
            self.passphrase.reset();
            self.notify("Passphrases do not match", Level::Error, now);
            return Ok(());
        }

        let params = KdfParams::generate(&self.config.vault)?;
        let key = derive_key(&self.passphrase.secret(), params)?;
        let collection = CredentialCollection::new();
        self.store.write(&key, &collection)?;
        info!(path = %self.store.path().display(), "created new vault");
        self.new_vault = false;
        self.unlock(key, collection)?;
        self.notify("Vault created", Level::Success, now);
        Ok(())
    }

    fn unlock(&mut self, key: VaultKey, collection: CredentialCollection) -> Result<(), KeywardError> {
        let mut index = SearchIndex::open(&self.config.search)?;
        let expected: BTreeSet<CredentialId> = collection.ids().copied().collect();
        if index.open_existing() && index.ids()? == expected {
            debug!("reusing persisted search index");
        } else {
            index.rebuild(&collection)?;
        }
        info!(entries = collection.len(), "vault unlocked");

        self.vault = Some(OpenVault {
            collection,
            key,
            index,
        });
        self.passphrase.reset();
        self.screen = Screen::Unlocked;
        self.mode = Mode::Navigate;
        self.query.clear();
        self.refresh_results()
    }

    // Unlocked screen

    /// Run `effect`. Returns whether the mode transition may proceed.
    fn run(&mut self, effect: Effect, now: Instant) -> Result<bool, KeywardError> {
        match effect {
            Effect::None => {}
            Effect::Quit => self.quit = true,
            Effect::AppendQuery(c) => {
                self.query.push(c);
                self.refresh_results()?;
            }
            Effect::EraseQuery => {
                if self.query.pop().is_some() {
                    self.refresh_results()?;
                }
            }
            Effect::ClearQuery => {
                self.query.clear();
                self.refresh_results()?;
            }
            Effect::CompleteQuery => {
                if let Some(completed) = self.completion().map(str::to_owned) {
                    self.query = completed;
                    self.refresh_results()?;
                }
            }
            Effect::Move(direction) => self.selection.apply(direction, self.results.len()),
            Effect::Copy => self.copy_selected(now),
            Effect::BeginEdit => {
                let Some(draft) = self.selected().map(|(id, c)| Draft::editing(id, c)) else {
                    return Ok(false);
                };
                self.draft = Some(draft);
            }
            Effect::BeginNew => self.draft = Some(Draft::new()),
            Effect::Delete => self.delete_selected(now)?,
            Effect::AppendField(c) => self.draft_mut()?.push(c),
            Effect::EraseField => self.draft_mut()?.pop(),
            Effect::FocusNext => self.draft_mut()?.focus_next(),
            Effect::FocusPrev => self.draft_mut()?.focus_prev(),
            Effect::Save => self.save_draft(now)?,
            Effect::Discard => self.draft = None,
            Effect::OpenChangePassphrase => {
                self.passphrase.reset();
                self.screen = Screen::ChangePassphrase;
            }
        }
        Ok(true)
    }

    fn draft_mut(&mut self) -> Result<&mut Draft, KeywardError> {
        self.draft
            .as_mut()
            .ok_or_else(|| KeywardError::Precondition("no credential is being edited".into()))
    }

    fn refresh_results(&mut self) -> Result<(), KeywardError> {
        let vault = self.vault.as_ref().ok_or_else(not_unlocked)?;
        self.results = vault.index.query(&self.query)?;
        self.selection.reset();
        debug!(
            query_len = self.query.chars().count(),
            results = self.results.len(),
            "results refreshed"
        );
        Ok(())
    }

    fn copy_selected(&mut self, now: Instant) {
        let Some(password) = self
            .selected()
            .map(|(_, c)| Zeroizing::new(c.password.clone()))
        else {
            return;
        };
        match self.clipboard.copy(&password) {
            Ok(()) => self.notify("Credentials copied", Level::Success, now),
            Err(e) => {
                warn!(error = %e, "clipboard copy failed");
                self.notify(format!("Copy failed: {e}"), Level::Error, now);
            }
        }
    }

    fn delete_selected(&mut self, now: Instant) -> Result<(), KeywardError> {
        let Some(id) = self.selection.selected(&self.results).copied() else {
            return Ok(());
        };
        let vault = self.vault.as_mut().ok_or_else(not_unlocked)?;
        let mut candidate = vault.collection.clone();
        if candidate.remove(&id).is_none() {
            return Ok(());
        }
        self.store.write(&vault.key, &candidate)?;
        vault.collection = candidate;
        vault.index.remove(&id)?;
        info!(%id, "credential deleted");

        self.refresh_results()?;
        self.notify("Credentials deleted", Level::Success, now);
        Ok(())
    }

    fn save_draft(&mut self, now: Instant) -> Result<(), KeywardError> {
        let draft = self
            .draft
            .take()
            .ok_or_else(|| KeywardError::Precondition("save without an open editor".into()))?;
        let vault = self.vault.as_mut().ok_or_else(not_unlocked)?;
        let target = draft.target();
        let id = target.id();
        if matches!(target, DraftTarget::Existing(_)) && !vault.collection.contains(&id) {
            return Err(KeywardError::Precondition(format!(
                "edited credential {id} no longer exists"
            )));
        }

        let credential = draft.to_credential();
        let mut candidate = vault.collection.clone();
        candidate.insert(id, credential.clone());
        self.store.write(&vault.key, &candidate)?;
        vault.collection = candidate;
        vault
            .index
            .upsert(&id, &credential.source, &credential.username)?;
        info!(%id, new = matches!(target, DraftTarget::New(_)), "credential saved");

        self.refresh_results()?;
        self.notify("Credentials saved", Level::Success, now);
        Ok(())
    }

    // Change-passphrase screen

    fn handle_change_passphrase(&mut self, action: Action, now: Instant) -> Result<(), KeywardError> {
        match action {
            Action::Type(c) => self.passphrase.push(c),
            Action::Erase => self.passphrase.pop(),
            Action::Back => {
                self.passphrase.reset();
                self.screen = Screen::Unlocked;
            }
            Action::Confirm => self.submit_new_passphrase(now)?,
            _ => {}
        }
        Ok(())
    }

    fn submit_new_passphrase(&mut self, now: Instant) -> Result<(), KeywardError> {
        if !self.passphrase.confirming() {
            if !self.passphrase.first_is_empty() {
                self.passphrase.begin_confirm();
            }
            return Ok(());
        }
        if self.passphrase.second_is_empty() {
            return Ok(());
        }
        if !self.passphrase.matches() {
            self.passphrase.reset();
            self.notify("Passphrases do not match", Level::Error, now);
            return Ok(());
        }

        let params = KdfParams::generate(&self.config.vault)?;
        let key = derive_key(&self.passphrase.secret(), params)?;
        let vault = self.vault.as_mut().ok_or_else(not_unlocked)?;
        self.store.write(&key, &vault.collection)?;
        vault.key = key;
        info!("vault passphrase changed");

        self.passphrase.reset();
        self.screen = Screen::Unlocked;
        self.notify("Passphrase changed", Level::Success, now);
        Ok(())
    }
}

impl<C> std::fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("path", &self.store.path())
            .field("unlocked", &self.vault.is_some())
            .field("screen", &self.screen)
            .field("mode", &self.mode)
            .field("results", &self.results.len())
            .finish_non_exhaustive()
    }
}
