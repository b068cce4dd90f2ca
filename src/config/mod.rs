//! Configuration module for Meer-Weer
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional: [`Config::default`] carries the built-in
//! site addresses, headers and output paths.
//!
//! # Example
//!
//! ```no_run
//! use meer_weer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("meer-weer.toml")).unwrap();
//! println!("Feed will be written to: {}", config.output.feed_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FeatureFlags, FeedConfig, HttpConfig, ItemLink, NotesConfig, OutputConfig, SiteConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
