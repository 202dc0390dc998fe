//! Single-object profile lookups
//!
//! A lookup retries HTTP 429 in a loop with a fixed cooldown. Every other
//! failure yields no profile; a missing profile never aborts the caller.

use crate::crawler::backoff::RateLimitBackoff;
use crate::crawler::endpoints::user_about_url;
use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::crawler::session::Session;
use crate::model::{About, UserProfile};
use std::time::Duration;

/// Fetches the public profile of `username`
///
/// # Returns
///
/// * `Some(UserProfile)` - HTTP 200 with a `data` object
/// * `None` - Any other status, transport or parse failure, an exhausted
///   retry cap, or cancellation during a cooldown
pub async fn fetch_profile(
    session: &Session,
    username: &str,
    cooldown: Duration,
) -> Option<UserProfile> {
    let url = match user_about_url(session.base_url(), username) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Cannot build profile URL for u/{}: {}", username, e);
            return None;
        }
    };

    let mut backoff = RateLimitBackoff::new(cooldown, session.config().client.max_rate_limit_retries);

    loop {
        match fetch_url(session.client(), &url).await {
            FetchResult::Success { body } => {
                return match serde_json::from_str::<About>(&body) {
                    Ok(about) => about.data,
                    Err(e) => {
                        tracing::debug!("Unreadable profile for u/{}: {}", username, e);
                        None
                    }
                };
            }
            FetchResult::RateLimited => {
                let Some(delay) = backoff.next_delay() else {
                    tracing::warn!(
                        "Giving up on u/{} after {} rate-limited attempts ({:?} waited)",
                        username,
                        backoff.retries(),
                        backoff.waited()
                    );
                    return None;
                };

                tracing::warn!(
                    "Too many requests for u/{} profile (attempt {}), sleeping {:?}",
                    username,
                    backoff.retries(),
                    delay
                );

                if !session.pause(delay).await {
                    return None;
                }
            }
            FetchResult::HttpError { status_code } => {
                tracing::debug!("Profile of u/{} unavailable: HTTP {}", username, status_code);
                return None;
            }
            FetchResult::NetworkError { error } => {
                tracing::debug!("Profile of u/{} failed: {}", username, error);
                return None;
            }
        }
    }
}
