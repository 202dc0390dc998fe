//! Cursor-paginated listing crawl
//!
//! The paginator walks a listing page by page, handing each item to a
//! [`PageVisitor`]. It knows nothing about what makes an item interesting;
//! it only decides when to stop:
//!
//! | Condition | Stop reason |
//! |-----------|-------------|
//! | Visitor satisfied (checked before each request and after each item) | `TargetReached` |
//! | Page with no items | `EmptyPage` |
//! | Page without a next cursor | `EndOfListing` |
//! | Non-200, non-429 status | `HttpStatus` |
//! | Transport failure | `Transport` |
//! | Unparseable page, or an item that does not fit `Item` | `Malformed` |
//! | Retry cap exceeded on 429 | `RetryBudgetExhausted` |
//! | Cancellation requested | `Cancelled` |
//!
//! HTTP 429 never advances the cursor: the identical request is repeated
//! after the cooldown.
//!
//! Items are decoded one at a time as they are visited, so a malformed item
//! ends the crawl without discarding the items visited before it.

use crate::crawler::backoff::RateLimitBackoff;
use crate::crawler::endpoints::ListingEndpoint;
use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::crawler::session::Session;
use crate::model::Listing;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Consumer of listing items
#[async_trait]
pub trait PageVisitor: Send {
    /// Payload of one listing child
    type Item: DeserializeOwned + Send;

    /// Returns true once the visitor needs no further items
    fn is_satisfied(&self) -> bool;

    /// Handles one item
    async fn visit(&mut self, item: Self::Item);
}

/// Pacing parameters of one crawl
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Items requested per page
    pub page_size: u32,

    /// Delay between consecutive pages
    pub page_delay: Duration,

    /// Fixed wait after an HTTP 429
    pub rate_limit_cooldown: Duration,

    /// Optional cap on consecutive 429s for one page
    pub max_rate_limit_retries: Option<u32>,
}

/// Why a crawl ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    EmptyPage,
    EndOfListing,
    HttpStatus(u16),
    Transport(String),
    Malformed(String),
    RetryBudgetExhausted,
    Cancelled,
}

impl StopReason {
    /// True when the crawl ended because something went wrong
    pub fn is_abort(&self) -> bool {
        matches!(
            self,
            Self::HttpStatus(_) | Self::Transport(_) | Self::Malformed(_) | Self::RetryBudgetExhausted
        )
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetReached => write!(f, "target reached"),
            Self::EmptyPage => write!(f, "no more items available"),
            Self::EndOfListing => write!(f, "end of listing"),
            Self::HttpStatus(code) => write!(f, "HTTP {}", code),
            Self::Transport(e) => write!(f, "transport error: {}", e),
            Self::Malformed(e) => write!(f, "malformed page: {}", e),
            Self::RetryBudgetExhausted => write!(f, "rate limit retries exhausted"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Outcome of one crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    /// Pages fetched successfully (rate-limited attempts excluded)
    pub pages: u32,

    /// Items handed to the visitor
    pub items: usize,

    /// HTTP 429 responses absorbed
    pub rate_limited: u32,

    pub stop: StopReason,
}

/// Walks a cursor-paginated listing
pub struct Paginator<'a> {
    session: &'a Session,
    settings: CrawlSettings,
}

impl<'a> Paginator<'a> {
    pub fn new(session: &'a Session, settings: CrawlSettings) -> Self {
        Self { session, settings }
    }

    /// Crawls `endpoint` until the visitor is satisfied or the listing ends
    ///
    /// Never fails: whatever the visitor accumulated before an abort is kept,
    /// and the reason is reported in the returned [`CrawlReport`].
    pub async fn crawl<V: PageVisitor>(
        &self,
        endpoint: &ListingEndpoint,
        visitor: &mut V,
    ) -> CrawlReport {
        let label = endpoint.describe();
        let mut pages = 0u32;
        let mut items = 0usize;
        let mut rate_limited = 0u32;
        let mut cursor: Option<String> = None;
        let mut backoff = RateLimitBackoff::new(
            self.settings.rate_limit_cooldown,
            self.settings.max_rate_limit_retries,
        );

        let stop = loop {
            if self.session.is_cancelled() {
                break StopReason::Cancelled;
            }
            if visitor.is_satisfied() {
                break StopReason::TargetReached;
            }

            let url = match endpoint.page_url(
                self.session.base_url(),
                self.settings.page_size,
                cursor.as_deref(),
            ) {
                Ok(url) => url,
                Err(e) => break StopReason::Transport(e.to_string()),
            };

            let body = match fetch_url(self.session.client(), &url).await {
                FetchResult::Success { body } => {
                    backoff.reset();
                    body
                }
                FetchResult::RateLimited => {
                    rate_limited += 1;
                    match backoff.next_delay() {
                        Some(delay) => {
                            tracing::warn!(
                                "Rate limited on {} (attempt {}), sleeping {:?}",
                                label,
                                backoff.retries(),
                                delay
                            );
                            if !self.session.pause(delay).await {
                                break StopReason::Cancelled;
                            }
                            continue;
                        }
                        None => break StopReason::RetryBudgetExhausted,
                    }
                }
                FetchResult::HttpError { status_code } => break StopReason::HttpStatus(status_code),
                FetchResult::NetworkError { error } => break StopReason::Transport(error),
            };

            let listing: Listing<Value> = match serde_json::from_str(&body) {
                Ok(listing) => listing,
                Err(e) => break StopReason::Malformed(e.to_string()),
            };
            let (page_items, after) = listing.into_parts();
            pages += 1;

            tracing::debug!(
                "Page {} of {}: {} items, next cursor {:?}",
                pages,
                label,
                page_items.len(),
                after
            );

            if page_items.is_empty() {
                break StopReason::EmptyPage;
            }

            let mut bad_item = None;
            for value in page_items {
                let item = match serde_json::from_value::<V::Item>(value) {
                    Ok(item) => item,
                    Err(e) => {
                        bad_item = Some(e.to_string());
                        break;
                    }
                };

                visitor.visit(item).await;
                items += 1;
                if visitor.is_satisfied() || self.session.is_cancelled() {
                    break;
                }
            }

            if let Some(message) = bad_item {
                break StopReason::Malformed(message);
            }

            if self.session.is_cancelled() {
                break StopReason::Cancelled;
            }
            if visitor.is_satisfied() {
                break StopReason::TargetReached;
            }

            match after {
                Some(after) => cursor = Some(after),
                None => break StopReason::EndOfListing,
            }

            if !self.session.pause(self.settings.page_delay).await {
                break StopReason::Cancelled;
            }
        };

        if stop.is_abort() {
            tracing::warn!("Crawl of {} aborted after {} pages: {}", label, pages, stop);
        } else {
            tracing::info!("Crawl of {} finished after {} pages: {}", label, pages, stop);
        }

        CrawlReport {
            pages,
            items,
            rate_limited,
            stop,
        }
    }
}
