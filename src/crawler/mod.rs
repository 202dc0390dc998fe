//! Crawler module for listing and profile requests
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and response classification
//! - Endpoint URL templates
//! - Cursor pagination with rate-limit back-off
//! - Clock and cancellation primitives for pacing

mod backoff;
mod endpoints;
mod fetcher;
mod pacing;
mod paginator;
mod profiles;
mod session;

pub use backoff::RateLimitBackoff;
pub use endpoints::{user_about_url, ListingEndpoint};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use pacing::{CancelFlag, Clock, ManualClock, SystemClock};
pub use paginator::{CrawlReport, CrawlSettings, PageVisitor, Paginator, StopReason};
pub use profiles::fetch_profile;
pub use session::Session;
