//! Shared request context for one run of the scraper

use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::pacing::{CancelFlag, Clock, SystemClock};
use crate::Result;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Everything a scraping operation needs to talk to the endpoints
///
/// Cheap to clone; clones share the HTTP connection pool, the clock, and the
/// cancellation flag.
#[derive(Clone)]
pub struct Session {
    config: Arc<Config>,
    client: Client,
    base_url: Url,
    clock: Arc<dyn Clock>,
    cancel: CancelFlag,
}

impl Session {
    /// Creates a session on the system clock
    pub fn new(config: Config) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock), CancelFlag::new())
    }

    /// Creates a session with an explicit clock and cancellation flag
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>, cancel: CancelFlag) -> Result<Self> {
        let client = build_http_client(&config.client)?;
        let base_url = Url::parse(&config.client.base_url)?;

        Ok(Self {
            config: Arc::new(config),
            client,
            base_url,
            clock,
            cancel,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Sleeps for a pacing delay; returns `false` if cancelled meanwhile
    pub async fn pause(&self, delay: Duration) -> bool {
        if delay.is_zero() {
            return !self.cancel.is_cancelled();
        }
        self.cancel.sleep(self.clock.as_ref(), delay).await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url.as_str())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
