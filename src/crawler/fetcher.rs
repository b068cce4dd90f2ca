//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests of a run:
//! - Building the HTTP clients carrying the browser-like header set
//! - GET requests for the broadcast pages
//! - HEAD probes of candidate audio URLs
//!
//! Failures never propagate: a page that cannot be fetched is absent and a
//! probe that cannot be sent is unsuccessful. Both are logged.

use crate::config::HttpConfig;
use crate::FeedError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;

/// Builds an HTTP client with the configured headers and timeout
///
/// # Arguments
///
/// * `config` - The request settings
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(FeedError)` - A header value is not valid or the client failed to build
///
/// # Example
///
/// ```no_run
/// use meer_weer::config::HttpConfig;
/// use meer_weer::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, FeedError> {
    Ok(client_builder(config)?.build()?)
}

/// Builds the client used for HEAD probes of audio URLs
///
/// Same headers and timeouts as [`build_http_client`], but redirects are
/// not followed: a candidate only counts when it answers `200 OK` itself.
pub fn build_probe_client(config: &HttpConfig) -> Result<Client, FeedError> {
    Ok(client_builder(config)?.redirect(Policy::none()).build()?)
}

fn client_builder(config: &HttpConfig) -> Result<ClientBuilder, FeedError> {
    let mut headers = HeaderMap::new();
    let accept = HeaderValue::from_str(&config.accept)
        .map_err(|e| FeedError::InvalidHeader(format!("accept: {}", e)))?;
    headers.insert(ACCEPT, accept);

    Ok(Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true))
}

/// Fetches a page and returns its markup
///
/// # Returns
///
/// * `Some(String)` - The response body of a successful GET
/// * `None` - Transport failure, non-success status or unreadable body
pub async fn fetch_page(client: &Client, url: &str) -> Option<String> {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Error fetching page {}: {}", url, describe_error(&e));
            return None;
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("Error fetching page {}: HTTP {}", url, status.as_u16());
        return None;
    }

    match response.text().await {
        Ok(body) => {
            tracing::debug!("Fetched {} ({} bytes)", url, body.len());
            Some(body)
        }
        Err(e) => {
            tracing::warn!("Error reading body of {}: {}", url, e);
            None
        }
    }
}

/// Checks with a HEAD request that an audio URL is being served
///
/// Only `200 OK` counts; anything else, including transport errors, is a
/// failed probe. Pass a client from [`build_probe_client`] so that redirects
/// are reported as such instead of being followed.
pub async fn probe_url(client: &Client, url: &str) -> bool {
    match client.head(url).send().await {
        Ok(response) if response.status() == StatusCode::OK => {
            tracing::debug!("Probe succeeded for {}", url);
            true
        }
        Ok(response) => {
            tracing::debug!(
                "Probe of {} returned HTTP {}",
                url,
                response.status().as_u16()
            );
            false
        }
        Err(e) => {
            tracing::warn!("Error checking {}: {}", url, describe_error(&e));
            false
        }
    }
}

/// Short classification of a transport error for the log
fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timeout".to_string()
    } else if e.is_connect() {
        "connection refused".to_string()
    } else {
        e.to_string()
    }
}
