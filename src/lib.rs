//! Meer-Weer: a podcast feed builder for a daily weather broadcast
//!
//! This crate scrapes a personal website for the daily audio broadcast (and
//! occasional special broadcasts), records discovered episodes in a local
//! SQLite store and republishes every known episode as an RSS 2.0 feed with
//! the iTunes podcast extension.

pub mod config;
pub mod crawler;
pub mod episode;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for Meer-Weer operations
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid request header: {0}")]
    InvalidHeader(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Meer-Weer operations
pub type Result<T> = std::result::Result<T, FeedError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_once, Coordinator, RunReport};
pub use episode::{Episode, NewEpisode};
pub use storage::{InsertOutcome, SqliteStorage, Storage};
