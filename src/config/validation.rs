use crate::config::types::{Config, HttpConfig, NotesConfig, OutputConfig, SiteConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_http_config(&config.http)?;
    validate_notes_config(&config.notes)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the site addresses
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_http_url("base_url", &config.base_url)?;
    validate_http_url("page_url", &config.page_url)?;
    validate_http_url("special_page_url", &config.special_page_url)?;
    validate_http_url("image_url", &config.image_url)?;

    // Candidate URLs are built by plain concatenation onto base_url
    if !config.dynamic_audio_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "dynamic_audio_path must start with '/', got '{}'",
            config.dynamic_audio_path
        )));
    }

    Ok(())
}

/// Validates request settings
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates the notes lookup settings
fn validate_notes_config(config: &NotesConfig) -> Result<(), ConfigError> {
    if config.anchor_fragment.is_empty() {
        return Err(ConfigError::Validation(
            "anchor_fragment cannot be empty".to_string(),
        ));
    }

    let is_tag_name = !config.value_tag.is_empty()
        && config
            .value_tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !is_tag_name || Selector::parse(&config.value_tag).is_err() {
        return Err(ConfigError::Validation(format!(
            "value_tag must be a plain tag name, got '{}'",
            config.value_tag
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.feed_path.is_empty() {
        return Err(ConfigError::Validation(
            "feed_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Checks that a configured address is an absolute http(s) URL
fn validate_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            name, value
        )));
    }

    Ok(())
}
