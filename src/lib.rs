//! Reddit-Sieve: a paced scraper for public subreddit and user listings
//!
//! This crate discovers established users active in a subreddit and collects
//! their text posts through the platform's unauthenticated JSON endpoints,
//! honoring rate limits and fixed pacing between requests.

pub mod config;
pub mod crawler;
pub mod filter;
pub mod jobs;
pub mod model;
pub mod output;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Reddit-Sieve operations
#[derive(Debug, Error)]
pub enum SieveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Fetch failed for u/{username}: {message}")]
    Fetch { username: String, message: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Pre-flight failures of a batch run
///
/// Each variant is raised before any network activity takes place.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Input file '{}' not found", .0.display())]
    InputNotFound(PathBuf),

    #[error("Fetch command '{}' not found", .0.display())]
    FetchCommandNotFound(PathBuf),

    #[error(
        "Could not detect subreddit from '{0}'. Format must be 'users_<Subreddit>_<mode>.csv'"
    )]
    SubredditUndetectable(String),

    #[error("Input file '{}' has no 'username' column", .0.display())]
    MissingUsernameColumn(PathBuf),

    #[error("Failed to read input file: {0}")]
    Read(#[from] csv::Error),
}

/// Result type alias for Reddit-Sieve operations
pub type Result<T> = std::result::Result<T, SieveError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CancelFlag, Clock, CrawlReport, StopReason, SystemClock};
pub use jobs::Session;
pub use model::{CandidateUser, PostRecord};
