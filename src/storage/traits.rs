//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::episode::{Episode, NewEpisode};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result of attempting to store an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was written with this id
    Inserted(i64),

    /// An episode with the same URL is already stored and was left untouched
    AlreadyExists,
}

/// Trait for episode store implementations
pub trait Storage {
    /// Stores an episode unless its URL is already known
    ///
    /// Deduplication relies on the uniqueness constraint of the backend, so
    /// two racing inserts of the same URL still produce a single row.
    fn insert_episode(&mut self, episode: &NewEpisode) -> StorageResult<InsertOutcome>;

    /// Returns every episode, newest first
    ///
    /// Ordering compares the stored `pub_date` strings, not timestamps.
    fn list_episodes(&self) -> StorageResult<Vec<Episode>>;

    /// Gets an episode by its audio URL
    fn get_episode_by_url(&self, url: &str) -> StorageResult<Option<Episode>>;

    /// Gets the total episode count
    fn count_episodes(&self) -> StorageResult<u64>;

    /// Counts episodes carrying non-empty notes
    fn count_episodes_with_notes(&self) -> StorageResult<u64>;
}
