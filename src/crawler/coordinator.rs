//! Run coordinator - one scrape, persist and render pass
//!
//! This module drives a single invocation:
//! - Fetching the broadcast page and discovering the daily audio URL
//! - Extracting notes and storing the daily episode
//! - Scraping the specials page (failures stay inside this pass)
//! - Regenerating the feed from everything stored

use crate::config::Config;
use crate::crawler::discovery::discover_audio_url;
use crate::crawler::fetcher::{build_http_client, build_probe_client, fetch_page};
use crate::crawler::parser::{extract_notes, extract_special_episodes};
use crate::episode::{broadcast_now, daily_title, format_pub_date, parse_special_title, NewEpisode};
use crate::output::{render_feed, write_feed};
use crate::storage::{InsertOutcome, SqliteStorage, Storage};
use crate::FeedError;
use chrono::Local;
use reqwest::Client;
use std::path::Path;
use url::Url;

/// What a run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Audio URL of the daily broadcast, if one was found
    pub daily_url: Option<String>,

    /// Outcome of storing the daily episode
    pub daily_outcome: Option<InsertOutcome>,

    /// Special episodes stored for the first time
    pub specials_inserted: usize,

    /// Special episodes that were already stored
    pub specials_existing: usize,

    /// Number of `<item>` elements in the written feed
    pub feed_items: usize,
}

/// Main run coordinator structure
pub struct Coordinator {
    config: Config,
    storage: SqliteStorage,
    client: Client,
    probe_client: Client,
}

impl Coordinator {
    /// Creates a coordinator that stores into the configured database
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Database opened and HTTP client built
    /// * `Err(FeedError)` - Failed to open the database or build the client
    pub fn new(config: Config) -> Result<Self, FeedError> {
        let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
        Self::with_storage(config, storage)
    }

    /// Creates a coordinator around an already opened store
    pub fn with_storage(config: Config, storage: SqliteStorage) -> Result<Self, FeedError> {
        let client = build_http_client(&config.http)?;
        let probe_client = build_probe_client(&config.http)?;
        Ok(Self {
            config,
            storage,
            client,
            probe_client,
        })
    }

    /// The episode store
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Runs the full pass
    ///
    /// Network problems never abort the run: without a daily episode or
    /// specials the feed is still regenerated from what is stored. When the
    /// broadcast page cannot be fetched no audio URL is probed. Only storage
    /// and feed-writing errors of the daily pass are returned.
    pub async fn run(&mut self) -> Result<RunReport, FeedError> {
        let mut report = RunReport::default();

        self.run_daily(&mut report).await?;

        if self.config.features.include_special_episodes {
            if let Err(e) = self.run_specials(&mut report).await {
                tracing::error!("Special episodes pass failed: {}", e);
            }
        }

        report.feed_items = self.render()?;

        tracing::info!(
            "Run finished: daily={:?}, specials inserted={}, existing={}, feed items={}",
            report.daily_outcome,
            report.specials_inserted,
            report.specials_existing,
            report.feed_items
        );

        Ok(report)
    }

    /// Finds and stores today's broadcast
    async fn run_daily(&mut self, report: &mut RunReport) -> Result<(), FeedError> {
        let site = &self.config.site;
        let Some(page_html) = fetch_page(&self.client, &site.page_url).await else {
            tracing::warn!("Broadcast page unavailable, skipping the daily episode");
            return Ok(());
        };

        let local = Local::now().naive_local();
        let Some(url) = discover_audio_url(&self.probe_client, site, &page_html, &local).await
        else {
            tracing::info!("No MP3 file found for today");
            return Ok(());
        };
        tracing::info!("Found MP3 URL: {}", url);

        let now = broadcast_now();
        let mut episode = NewEpisode::new(url.clone(), daily_title(&now), format_pub_date(&now));
        if self.config.features.include_notes {
            episode = episode.with_notes(extract_notes(&page_html, &self.config.notes));
        }

        let outcome = self.store(&episode)?;
        report.daily_url = Some(url);
        report.daily_outcome = Some(outcome);
        Ok(())
    }

    /// Stores every special broadcast on the specials page
    async fn run_specials(&mut self, report: &mut RunReport) -> Result<(), FeedError> {
        let page_url = Url::parse(&self.config.site.special_page_url)?;
        let Some(html) = fetch_page(&self.client, page_url.as_str()).await else {
            tracing::warn!("Specials page unavailable, skipping special episodes");
            return Ok(());
        };

        let specials = extract_special_episodes(&html, &page_url);
        tracing::info!("Found {} special episodes", specials.len());

        let now = broadcast_now();
        for special in specials {
            let parsed = parse_special_title(&special.raw_title, &now);
            let episode = NewEpisode::new(special.source, parsed.title, parsed.pub_date);
            match self.store(&episode)? {
                InsertOutcome::Inserted(_) => report.specials_inserted += 1,
                InsertOutcome::AlreadyExists => report.specials_existing += 1,
            }
        }

        Ok(())
    }

    /// Inserts an episode and logs the outcome
    fn store(&mut self, episode: &NewEpisode) -> Result<InsertOutcome, FeedError> {
        let outcome = self.storage.insert_episode(episode)?;
        match outcome {
            InsertOutcome::Inserted(id) => {
                tracing::info!("Episode added (id {}): {}", id, episode.title)
            }
            InsertOutcome::AlreadyExists => {
                tracing::info!("Episode already exists, skipping: {}", episode.url)
            }
        }
        Ok(outcome)
    }

    /// Regenerates the feed file from the store, returning the item count
    pub fn render(&self) -> Result<usize, FeedError> {
        render_from_storage(&self.storage, &self.config)
    }
}

/// Writes the feed for everything in `storage` to the configured path
pub fn render_from_storage(storage: &dyn Storage, config: &Config) -> Result<usize, FeedError> {
    let episodes = storage.list_episodes()?;
    let xml = render_feed(&episodes, config)?;
    let path = Path::new(&config.output.feed_path);
    write_feed(path, &xml)?;
    tracing::info!(
        "RSS feed written to {} ({} episodes)",
        path.display(),
        episodes.len()
    );
    Ok(episodes.len())
}
