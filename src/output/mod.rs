//! Output module for the podcast feed
//!
//! This module handles:
//! - Rendering stored episodes as an RSS 2.0 document
//! - Replacing the feed file on disk
//! - Store statistics for the command line

mod rss;
pub mod stats;

pub use rss::{item_description, render_feed, write_feed, AUDIO_MIME_TYPE, ITUNES_NAMESPACE};
pub use stats::{load_statistics, print_statistics, StoreStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
