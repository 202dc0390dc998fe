//! The three scraping operations
//!
//! - `discover`: find qualified authors in a subreddit
//! - `fetch`: collect one user's text posts
//! - `batch`: run `fetch` for every user of a discovery table

mod batch;
mod discover;
mod fetch;

pub use batch::{
    prepare_batch, run_batch, BatchOptions, BatchPlan, BatchReport, CommandFetcher,
    InProcessFetcher, UserFetcher,
};
pub use discover::{discover_users, run_discovery, DiscoveryOutcome, DiscoveryRequest};
pub use fetch::{fetch_posts, run_fetch, FetchOutcome, FetchRequest, DEFAULT_POST_COUNT};

pub use crate::crawler::Session;
