use serde::Deserialize;
use std::time::Duration;

/// User agent sent when the config file does not name one
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) reddit-sieve/1.0 (public listing reader)";

/// Main configuration structure for Reddit-Sieve
///
/// Every section and key is optional; missing values fall back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub client: ClientConfig,
    pub discovery: DiscoveryConfig,
    pub fetch: FetchConfig,
    pub batch: BatchConfig,
    pub output: OutputConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Value of the `User-Agent` header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Scheme and host of the listing endpoints
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Per-request timeout in seconds. Unset means requests never time out.
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: Option<u64>,

    /// Maximum consecutive HTTP 429 responses absorbed for one request.
    /// Unset means retry forever.
    #[serde(rename = "max-rate-limit-retries")]
    pub max_rate_limit_retries: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            base_url: "https://www.reddit.com".to_string(),
            request_timeout_secs: None,
            max_rate_limit_retries: None,
        }
    }
}

/// User discovery configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Minimum combined link and comment karma
    #[serde(rename = "min-karma")]
    pub min_karma: i64,

    /// Minimum account age in days
    #[serde(rename = "min-age-days")]
    pub min_age_days: f64,

    /// Items requested per listing page
    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Delay before each profile lookup (milliseconds)
    #[serde(rename = "profile-delay-ms")]
    pub profile_delay_ms: u64,

    /// Cooldown after an HTTP 429 from the listing or a profile (seconds)
    #[serde(rename = "rate-limit-cooldown-secs")]
    pub rate_limit_cooldown_secs: u64,

    /// Trailing segment of the discovery output filename
    #[serde(rename = "mode-label")]
    pub mode_label: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            min_karma: 500,
            min_age_days: 180.0,
            page_size: 25,
            profile_delay_ms: 1500,
            rate_limit_cooldown_secs: 10,
            mode_label: "noapi".to_string(),
        }
    }
}

impl DiscoveryConfig {
    pub fn profile_delay(&self) -> Duration {
        Duration::from_millis(self.profile_delay_ms)
    }

    pub fn rate_limit_cooldown(&self) -> Duration {
        Duration::from_secs(self.rate_limit_cooldown_secs)
    }
}

/// Post fetching configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Items requested per listing page
    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Delay after each page (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// Cooldown after an HTTP 429 (seconds)
    #[serde(rename = "rate-limit-cooldown-secs")]
    pub rate_limit_cooldown_secs: u64,

    /// Minimum whitespace-separated words in a post body
    #[serde(rename = "min-word-count")]
    pub min_word_count: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: 25,
            page_delay_ms: 3000,
            rate_limit_cooldown_secs: 600,
            min_word_count: 15,
        }
    }
}

impl FetchConfig {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn rate_limit_cooldown(&self) -> Duration {
        Duration::from_secs(self.rate_limit_cooldown_secs)
    }
}

/// Batch driver configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Delay after each user, successful or not (milliseconds)
    #[serde(rename = "user-delay-ms")]
    pub user_delay_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            user_delay_ms: 5000,
        }
    }
}

impl BatchConfig {
    pub fn user_delay(&self) -> Duration {
        Duration::from_millis(self.user_delay_ms)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives every generated file
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
        }
    }
}
