//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made by the scraper:
//! - Building the HTTP client with the configured user agent
//! - GET requests against the JSON endpoints
//! - Classifying responses into success, rate limit, or terminal failure

use crate::config::ClientConfig;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// HTTP 200 with its body
    Success {
        /// Response body text
        body: String,
    },

    /// HTTP 429; the same request may be retried after a cooldown
    RateLimited,

    /// Any other non-200 status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Transport failure (connection refused, timeout, unreadable body, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// No request timeout is applied unless `request-timeout-secs` is set.
///
/// # Arguments
///
/// * `config` - The HTTP client configuration
///
/// # Example
///
/// ```no_run
/// use reddit_sieve::config::ClientConfig;
/// use reddit_sieve::crawler::build_http_client;
///
/// let client = build_http_client(&ClientConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &ClientConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.clone())
        .gzip(true)
        .brotli(true);

    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Fetches a URL and classifies the response
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 200 | `Success` |
/// | HTTP 429 | `RateLimited` |
/// | Other status | `HttpError` |
/// | Transport or body read error | `NetworkError` |
pub async fn fetch_url(client: &Client, url: &Url) -> FetchResult {
    tracing::trace!("GET {}", url);

    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        return FetchResult::RateLimited;
    }

    if status != StatusCode::OK {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success { body },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}
