//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::episode::{Episode, NewEpisode};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{InsertOutcome, Storage, StorageResult};
use crate::FeedError;
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates the episode database at `path`
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(FeedError)` - Failed to open database or create the schema
    pub fn new(path: &Path) -> Result<Self, FeedError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, FeedError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Maps a row of `SELECT id, url, title, pub_date, notes`
///
/// Upgraded legacy tables allow NULL in every column; those read as empty.
fn episode_from_row(row: &Row<'_>) -> rusqlite::Result<Episode> {
    Ok(Episode {
        id: row.get(0)?,
        url: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        title: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        pub_date: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        notes: row.get(4)?,
    })
}

/// True for a violated UNIQUE constraint (the `url` column)
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

impl Storage for SqliteStorage {
    fn insert_episode(&mut self, episode: &NewEpisode) -> StorageResult<InsertOutcome> {
        let result = self.conn.execute(
            "INSERT INTO episodes (url, pub_date, title, notes) VALUES (?1, ?2, ?3, ?4)",
            params![episode.url, episode.pub_date, episode.title, episode.notes],
        );

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted(self.conn.last_insert_rowid())),
            Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::AlreadyExists),
            Err(e) => Err(e.into()),
        }
    }

    fn list_episodes(&self) -> StorageResult<Vec<Episode>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, url, title, pub_date, notes FROM episodes
             ORDER BY pub_date DESC, id DESC",
        )?;

        let episodes = stmt
            .query_map([], episode_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(episodes)
    }

    fn get_episode_by_url(&self, url: &str) -> StorageResult<Option<Episode>> {
        let episode = self
            .conn
            .query_row(
                "SELECT id, url, title, pub_date, notes FROM episodes WHERE url = ?1",
                params![url],
                episode_from_row,
            )
            .optional()?;

        Ok(episode)
    }

    fn count_episodes(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM episodes", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_episodes_with_notes(&self) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM episodes WHERE notes IS NOT NULL AND TRIM(notes) != ''",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(url: &str, pub_date: &str) -> NewEpisode {
        NewEpisode::new(url, format!("Aflevering {}", pub_date), pub_date)
    }

    #[test]
    fn test_create_in_memory() {
        let storage = SqliteStorage::new_in_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_insert_episode() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let outcome = storage
            .insert_episode(&episode("https://a/1.mp3", "Mon, 03 Jul 2023 00:00:00 GMT"))
            .unwrap();

        assert!(matches!(outcome, InsertOutcome::Inserted(id) if id > 0));
        assert_eq!(storage.count_episodes().unwrap(), 1);
    }

    #[test]
    fn test_insert_duplicate_url_is_noop() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let first = NewEpisode::new(
            "https://a/1.mp3",
            "Origineel",
            "Mon, 03 Jul 2023 00:00:00 GMT",
        )
        .with_notes("12° / 18°");
        storage.insert_episode(&first).unwrap();

        let second = NewEpisode::new(
            "https://a/1.mp3",
            "Overschreven",
            "Tue, 04 Jul 2023 00:00:00 GMT",
        );
        let outcome = storage.insert_episode(&second).unwrap();

        assert_eq!(outcome, InsertOutcome::AlreadyExists);
        assert_eq!(storage.count_episodes().unwrap(), 1);

        let stored = storage
            .get_episode_by_url("https://a/1.mp3")
            .unwrap()
            .unwrap();
        assert_eq!(stored.title, "Origineel");
        assert_eq!(stored.pub_date, "Mon, 03 Jul 2023 00:00:00 GMT");
        assert_eq!(stored.notes.as_deref(), Some("12° / 18°"));
    }

    #[test]
    fn test_list_episodes_sorts_by_date_string_descending() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .insert_episode(&episode("https://a/1.mp3", "Mon, 03 Jul 2023 00:00:00 GMT"))
            .unwrap();
        storage
            .insert_episode(&episode("https://a/2.mp3", "Wed, 05 Jul 2023 08:00:00 GMT"))
            .unwrap();
        storage
            .insert_episode(&episode("https://a/3.mp3", "Fri, 01 Sep 2023 08:00:00 GMT"))
            .unwrap();

        let dates: Vec<String> = storage
            .list_episodes()
            .unwrap()
            .into_iter()
            .map(|e| e.pub_date)
            .collect();

        // Lexical order: the weekday prefix decides, not the calendar
        assert_eq!(
            dates,
            vec![
                "Wed, 05 Jul 2023 08:00:00 GMT",
                "Mon, 03 Jul 2023 00:00:00 GMT",
                "Fri, 01 Sep 2023 08:00:00 GMT",
            ]
        );
    }

    #[test]
    fn test_get_missing_episode() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        assert!(storage
            .get_episode_by_url("https://a/missing.mp3")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_count_episodes_with_notes() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .insert_episode(
                &episode("https://a/1.mp3", "Mon, 03 Jul 2023 00:00:00 GMT").with_notes("zon"),
            )
            .unwrap();
        storage
            .insert_episode(&episode("https://a/2.mp3", "Tue, 04 Jul 2023 00:00:00 GMT"))
            .unwrap();

        assert_eq!(storage.count_episodes_with_notes().unwrap(), 1);
    }

    #[test]
    fn test_reopen_file_keeps_episodes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episodes.db");

        {
            let mut storage = SqliteStorage::new(&path).unwrap();
            storage
                .insert_episode(&episode("https://a/1.mp3", "Mon, 03 Jul 2023 00:00:00 GMT"))
                .unwrap();
        }

        let mut storage = SqliteStorage::new(&path).unwrap();
        assert_eq!(storage.count_episodes().unwrap(), 1);
        let outcome = storage
            .insert_episode(&episode("https://a/1.mp3", "Mon, 03 Jul 2023 00:00:00 GMT"))
            .unwrap();
        assert_eq!(outcome, InsertOutcome::AlreadyExists);
    }

    #[test]
    fn test_legacy_rows_with_nulls_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episodes.db");

        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE episodes (
                    id INTEGER PRIMARY KEY,
                    url TEXT UNIQUE,
                    pub_date TEXT,
                    title TEXT
                );
                INSERT INTO episodes (url, pub_date, title)
                VALUES ('https://a/1.mp3', NULL, 'Oud'),
                       ('https://a/2.mp3', 'Mon, 03 Jul 2023 00:00:00 GMT', NULL);",
            )
            .unwrap();
        }

        let storage = SqliteStorage::new(&path).unwrap();
        let episodes = storage.list_episodes().unwrap();

        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].url, "https://a/2.mp3");
        assert_eq!(episodes[0].title, "");
        assert_eq!(episodes[1].title, "Oud");
        assert_eq!(episodes[1].pub_date, "");
    }
}
