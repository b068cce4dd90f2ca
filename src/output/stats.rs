//! Statistics about the episode store
//!
//! This module provides functionality for extracting and displaying
//! store statistics for the `--stats` mode.

use crate::storage::Storage;
use crate::FeedError;

/// Episode store summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStatistics {
    /// Total number of stored episodes
    pub total_episodes: u64,

    /// Episodes carrying notes
    pub episodes_with_notes: u64,

    /// First episode in feed order
    pub newest: Option<(String, String)>,

    /// Last episode in feed order
    pub oldest: Option<(String, String)>,
}

/// Loads statistics from storage
///
/// `newest` and `oldest` follow feed order, which compares the date strings.
pub fn load_statistics(storage: &dyn Storage) -> Result<StoreStatistics, FeedError> {
    let episodes = storage.list_episodes()?;

    Ok(StoreStatistics {
        total_episodes: storage.count_episodes()?,
        episodes_with_notes: storage.count_episodes_with_notes()?,
        newest: episodes
            .first()
            .map(|e| (e.pub_date.clone(), e.title.clone())),
        oldest: episodes
            .last()
            .map(|e| (e.pub_date.clone(), e.title.clone())),
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Episode Statistics ===\n");

    println!("Overview:");
    println!("  Total episodes: {}", stats.total_episodes);

    let percentage = if stats.total_episodes > 0 {
        (stats.episodes_with_notes as f64 / stats.total_episodes as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "  With notes: {} ({:.1}%)",
        stats.episodes_with_notes, percentage
    );
    println!();

    if let Some((date, title)) = &stats.newest {
        println!("Newest: {} ({})", title, date);
    }
    if let Some((date, title)) = &stats.oldest {
        println!("Oldest: {} ({})", title, date);
    }
}
