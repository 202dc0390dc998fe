//! Configuration module for Reddit-Sieve
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; the defaults reproduce the pacing and thresholds the
//! scraper has always used.
//!
//! # Example
//!
//! ```no_run
//! use reddit_sieve::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sieve.toml")).unwrap();
//! println!("Fetch cooldown: {:?}", config.fetch.rate_limit_cooldown());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BatchConfig, ClientConfig, Config, DiscoveryConfig, FetchConfig, OutputConfig,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
pub use validation::validate;
