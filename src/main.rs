//! Meer-Weer main entry point
//!
//! This is the command-line interface for the Meer-Weer feed builder. It is
//! meant to be run once per day by an external scheduler.

use clap::Parser;
use meer_weer::config::{load_config_with_hash, Config};
use meer_weer::crawler::{render_from_storage, run_once};
use meer_weer::output::{load_statistics, print_statistics};
use meer_weer::storage::SqliteStorage;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Meer-Weer: builds a podcast feed from the daily weather broadcast
///
/// Each run looks for today's broadcast and any new special broadcasts,
/// stores what it has not seen before and rewrites the RSS feed from every
/// stored episode.
#[derive(Parser, Debug)]
#[command(name = "meer-weer")]
#[command(version = "1.0.0")]
#[command(about = "Builds a podcast feed from the daily weather broadcast", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be fetched without fetching
    #[arg(long, conflicts_with_all = ["stats", "render_only"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "render_only"])]
    stats: bool,

    /// Regenerate the feed from the database without scraping
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    render_only: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::debug!("No configuration file given, using built-in defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.render_only {
        handle_render_only(&config)?;
    } else {
        handle_run(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("meer_weer=info,warn"),
            1 => EnvFilter::new("meer_weer=debug,info"),
            2 => EnvFilter::new("meer_weer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what a run would do
fn handle_dry_run(config: &Config) {
    println!("=== Meer-Weer Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Broadcast page: {}", config.site.page_url);
    println!(
        "  Cache-busted audio: {}{}<token>",
        config.site.base_url, config.site.dynamic_audio_path
    );
    println!("  Specials page: {}", config.site.special_page_url);

    println!("\nFeatures:");
    println!("  Notes: {}", config.features.include_notes);
    println!(
        "  Special episodes: {}",
        config.features.include_special_episodes
    );
    println!("  iTunes image: {}", config.features.include_itunes_image);
    println!("  Item link: {:?}", config.feed.item_link);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Feed: {}", config.output.feed_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --render-only mode: rewrites the feed from stored episodes
fn handle_render_only(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let items = render_from_storage(&storage, config)?;

    println!(
        "✓ Feed with {} episodes written to: {}",
        items, config.output.feed_path
    );

    Ok(())
}

/// Handles the default mode: one scrape, store and render pass
async fn handle_run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    match run_once(config).await {
        Ok(report) => {
            if report.daily_url.is_none() {
                tracing::info!("No daily broadcast found this run");
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}
