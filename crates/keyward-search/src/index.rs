// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite FTS5 index over credential sources and usernames.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use keyward_config::SearchConfig;
use keyward_core::{CredentialCollection, CredentialId, KeywardError};
use rusqlite::{Connection, params};
use tracing::{debug, info};

use crate::terms;

/// File name of the persisted index inside `search.index_dir`.
pub const INDEX_FILE: &str = "index.db";

/// Bumped whenever the table layout or tokenizer changes; an index written
/// under another version is dropped and rebuilt.
const SCHEMA_VERSION: i64 = 2;

// `._-@` stay inside tokens so `john_doe` and `carol.smith` index as one
// term each and whole usernames match by substring.
const SCHEMA: &str = "
    CREATE VIRTUAL TABLE IF NOT EXISTS entries USING fts5(
        id UNINDEXED,
        source,
        username,
        tokenize = \"unicode61 remove_diacritics 0 tokenchars '._-@'\"
    );
    CREATE VIRTUAL TABLE IF NOT EXISTS entries_vocab USING fts5vocab(entries, 'row');
";

fn index_err(e: rusqlite::Error) -> KeywardError {
    KeywardError::Index {
        source: Box::new(e),
    }
}

/// Searchable mirror of the credential collection.
///
/// Holds only ids, sources, and usernames. Passwords never enter the index.
pub struct SearchIndex {
    conn: Connection,
    max_results: usize,
    location: Option<PathBuf>,
    reusable: bool,
}

impl SearchIndex {
    /// Open the index described by `config`: on disk when `persist_index` is
    /// set, otherwise in memory.
    pub fn open(config: &SearchConfig) -> Result<Self, KeywardError> {
        if !config.persist_index {
            return Self::open_in_memory(config.max_results);
        }
        std::fs::create_dir_all(&config.index_dir).map_err(|e| {
            KeywardError::io("failed to create index directory", &config.index_dir, e)
        })?;
        Self::open_at(&config.index_dir.join(INDEX_FILE), config.max_results)
    }

    /// Open (or create) an index database at `path`.
    pub fn open_at(path: &Path, max_results: usize) -> Result<Self, KeywardError> {
        let conn = Connection::open(path).map_err(index_err)?;
        Self::init(conn, max_results, Some(path.to_path_buf()))
    }

    /// An index that lives only as long as this handle.
    pub fn open_in_memory(max_results: usize) -> Result<Self, KeywardError> {
        let conn = Connection::open_in_memory().map_err(index_err)?;
        Self::init(conn, max_results, None)
    }

    fn init(
        conn: Connection,
        max_results: usize,
        location: Option<PathBuf>,
    ) -> Result<Self, KeywardError> {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'entries')",
                [],
                |row| row.get(0),
            )
            .map_err(index_err)?;
        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .map_err(index_err)?;
        let reusable = exists && version == SCHEMA_VERSION;
        if exists && !reusable {
            info!(version, "search index schema outdated, recreating");
            conn.execute_batch(
                "DROP TABLE IF EXISTS entries_vocab; DROP TABLE IF EXISTS entries;",
            )
            .map_err(index_err)?;
        }
        conn.execute_batch(SCHEMA).map_err(index_err)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(index_err)?;
        debug!(
            location = ?location,
            reusable,
            "search index opened"
        );
        Ok(Self {
            conn,
            max_results,
            location,
            reusable,
        })
    }

    /// Whether a previously persisted index was found and may be reused
    /// instead of rebuilding.
    pub fn open_existing(&self) -> bool {
        self.reusable
    }

    /// Path of the backing database, `None` for an in-memory index.
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// Replace the whole index with the contents of `collection`.
    pub fn rebuild(&mut self, collection: &CredentialCollection) -> Result<(), KeywardError> {
        let tx = self.conn.transaction().map_err(index_err)?;
        tx.execute("DELETE FROM entries", []).map_err(index_err)?;
        {
            let mut insert = tx
                .prepare("INSERT INTO entries (id, source, username) VALUES (?1, ?2, ?3)")
                .map_err(index_err)?;
            for (id, credential) in collection.iter() {
                insert
                    .execute(params![
                        id.to_string(),
                        credential.source,
                        credential.username
                    ])
                    .map_err(index_err)?;
            }
        }
        tx.commit().map_err(index_err)?;
        self.reusable = true;
        info!(entries = collection.len(), "search index rebuilt");
        Ok(())
    }

    /// Index or re-index one credential.
    pub fn upsert(
        &mut self,
        id: &CredentialId,
        source: &str,
        username: &str,
    ) -> Result<(), KeywardError> {
        let id = id.to_string();
        let tx = self.conn.transaction().map_err(index_err)?;
        tx.execute("DELETE FROM entries WHERE id = ?1", params![id])
            .map_err(index_err)?;
        tx.execute(
            "INSERT INTO entries (id, source, username) VALUES (?1, ?2, ?3)",
            params![id, source, username],
        )
        .map_err(index_err)?;
        tx.commit().map_err(index_err)?;
        debug!(%id, "search index entry upserted");
        Ok(())
    }

    /// Drop one credential from the index. Unknown ids are ignored.
    pub fn remove(&mut self, id: &CredentialId) -> Result<(), KeywardError> {
        let id = id.to_string();
        self.conn
            .execute("DELETE FROM entries WHERE id = ?1", params![id])
            .map_err(index_err)?;
        debug!(%id, "search index entry removed");
        Ok(())
    }

    /// Every id currently in the index.
    pub fn ids(&self) -> Result<BTreeSet<CredentialId>, KeywardError> {
        let mut stmt = self.conn.prepare("SELECT id FROM entries").map_err(index_err)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(index_err)?;
        rows.map(|row| parse_id(row.map_err(index_err)?))
            .collect()
    }

    /// Run a query.
    ///
    /// A blank query lists every id ordered by source, case-insensitively,
    /// with ties broken by id. Otherwise each whitespace-separated word is
    /// matched against indexed terms by substring (which includes prefix) and
    /// by edit distance. Terms split only on whitespace and punctuation other
    /// than `._-@`, so a whole username is a single term, and the hits come back in relevance order, capped at
    /// `max_results`.
    pub fn query(&self, text: &str) -> Result<Vec<CredentialId>, KeywardError> {
        if text.trim().is_empty() {
            return self.list_all();
        }

        let vocabulary = self.vocabulary()?;
        let matched = terms::matching_terms(text, &vocabulary);
        let Some(expression) = terms::match_expression(&matched) else {
            return Ok(Vec::new());
        };

        let mut stmt = self
            .conn
            .prepare("SELECT id FROM entries WHERE entries MATCH ?1 ORDER BY rank LIMIT ?2")
            .map_err(index_err)?;
        let limit = i64::try_from(self.max_results).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![expression, limit], |row| row.get::<_, String>(0))
            .map_err(index_err)?;
        rows.map(|row| parse_id(row.map_err(index_err)?))
            .collect()
    }

    /// Close the underlying connection, surfacing any error.
    pub fn close(self) -> Result<(), KeywardError> {
        self.conn.close().map_err(|(_, e)| index_err(e))
    }

    fn list_all(&self) -> Result<Vec<CredentialId>, KeywardError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, source FROM entries")
            .map_err(index_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(index_err)?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, source) = row.map_err(index_err)?;
            entries.push((source.to_lowercase(), parse_id(id)?));
        }
        entries.sort();
        Ok(entries.into_iter().map(|(_, id)| id).collect())
    }

    fn vocabulary(&self) -> Result<Vec<String>, KeywardError> {
        let mut stmt = self
            .conn
            .prepare("SELECT term FROM entries_vocab")
            .map_err(index_err)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(index_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(index_err)
    }
}

fn parse_id(raw: String) -> Result<CredentialId, KeywardError> {
    raw.parse().map_err(|e| KeywardError::Index {
        source: format!("invalid id `{raw}` in search index: {e}").into(),
    })
}
