//! HTTP fetcher
//!
//! This module handles the HTTP side of a mirror run:
//! - Building the client with the configured user agent and timeouts
//! - One GET per URL, with error classification
//!
//! The crawl is strictly sequential, so there is no retry queue or
//! connection juggling here. Redirects are left to the client's own
//! policy.

use crate::config::FetchConfig;
use crate::MirrorError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds the HTTP client used for the whole run
///
/// # Arguments
///
/// * `config` - The fetch configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one URL and returns the response body
///
/// Pages and assets share this code path; whether the body is treated as
/// markup is decided later from the mapped local path, not from the
/// response. A transport failure or non-success status aborts only the
/// branch of the crawl that requested this URL.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - The response body
/// * `Err(MirrorError)` - Transport failure or non-success status
pub async fn fetch_url(client: &Client, url: &Url) -> Result<Vec<u8>, MirrorError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| MirrorError::Fetch {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(MirrorError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(|source| MirrorError::Fetch {
        url: url.to_string(),
        source,
    })?;

    Ok(body.to_vec())
}
