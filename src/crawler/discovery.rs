//! Discovery of the daily broadcast audio URL
//!
//! The site links the daily broadcast through a cache-busted URL that is
//! sometimes stale, and embeds a fallback path in the page script. The fresh
//! candidate is probed first, the fallback second.

use crate::config::SiteConfig;
use crate::crawler::fetcher::probe_url;
use crate::crawler::parser::extract_fallback_path;
use chrono::{Datelike, NaiveDateTime, Timelike};
use reqwest::Client;

/// Builds the cache-killing query token from a local wall-clock time
///
/// Day, hour, minute, second and millisecond are concatenated as unpadded
/// decimal numbers: day 3 at 14:05:09.042 gives `"3145942"`.
pub fn cachekill_token(local: &NaiveDateTime) -> String {
    format!(
        "{}{}{}{}{}",
        local.day(),
        local.hour(),
        local.minute(),
        local.second(),
        local.nanosecond() / 1_000_000
    )
}

/// The cache-busted candidate URL for the given token
pub fn dynamic_audio_url(site: &SiteConfig, token: &str) -> String {
    format!("{}{}{}", site.base_url, site.dynamic_audio_path, token)
}

/// Finds the URL currently serving the daily broadcast
///
/// # Arguments
///
/// * `client` - The HTTP client to probe with, see [`build_probe_client`](crate::crawler::build_probe_client)
/// * `site` - Site addresses
/// * `page_html` - Markup of the broadcast page
/// * `local` - Local wall-clock time used for the cache-killing token
///
/// # Returns
///
/// * `Some(url)` - The first candidate whose HEAD probe succeeded
/// * `None` - Neither the cache-busted URL nor the fallback is available
pub async fn discover_audio_url(
    client: &Client,
    site: &SiteConfig,
    page_html: &str,
    local: &NaiveDateTime,
) -> Option<String> {
    let dynamic_url = dynamic_audio_url(site, &cachekill_token(local));
    if probe_url(client, &dynamic_url).await {
        return Some(dynamic_url);
    }
    tracing::debug!("Cache-busted URL not available, trying fallback");

    let fallback_path = extract_fallback_path(page_html)?;
    let fallback_url = format!("{}{}", site.base_url, fallback_path);
    if probe_url(client, &fallback_url).await {
        return Some(fallback_url);
    }

    tracing::debug!("Fallback URL {} not available", fallback_url);
    None
}
