//! Storage module for persisting discovered episodes
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - URL-keyed deduplication of episodes
//! - Listing episodes in feed order

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{InsertOutcome, Storage, StorageError, StorageResult};

