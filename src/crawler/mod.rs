//! Scraping pipeline for the broadcast site
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching and HEAD probing
//! - Discovery of the daily broadcast URL
//! - HTML extraction of notes and special broadcasts
//! - Coordination of one scrape, store and render pass

mod coordinator;
mod discovery;
mod fetcher;
mod parser;

pub use coordinator::{render_from_storage, Coordinator, RunReport};
pub use discovery::{cachekill_token, discover_audio_url, dynamic_audio_url};
pub use fetcher::{build_http_client, build_probe_client, fetch_page, probe_url};
pub use parser::{extract_fallback_path, extract_notes, extract_special_episodes, RawSpecial};

use crate::config::Config;
use crate::FeedError;

/// Runs one complete pass
///
/// This is the main entry point. It will:
/// 1. Open the episode store
/// 2. Build the HTTP client
/// 3. Discover and store the daily broadcast
/// 4. Store new special broadcasts, if enabled
/// 5. Regenerate the feed
pub async fn run_once(config: Config) -> Result<RunReport, FeedError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
