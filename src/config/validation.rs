use crate::config::types::{ClientConfig, Config, DiscoveryConfig, FetchConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Largest page the listing endpoints will serve
const MAX_PAGE_SIZE: u32 = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_client_config(&config.client)?;
    validate_discovery_config(&config.discovery)?;
    validate_fetch_config(&config.fetch)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates HTTP client configuration
fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    // Requests without an identifying agent are blocked by the remote service
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' cannot be used as a base",
            config.base_url
        )));
    }

    if config.request_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates discovery configuration
fn validate_discovery_config(config: &DiscoveryConfig) -> Result<(), ConfigError> {
    validate_page_size("discovery", config.page_size)?;

    if config.min_karma < 0 {
        return Err(ConfigError::Validation(format!(
            "min-karma must be >= 0, got {}",
            config.min_karma
        )));
    }

    if !config.min_age_days.is_finite() || config.min_age_days < 0.0 {
        return Err(ConfigError::Validation(format!(
            "min-age-days must be a non-negative number, got {}",
            config.min_age_days
        )));
    }

    if config.mode_label.is_empty() {
        return Err(ConfigError::Validation(
            "mode-label cannot be empty".to_string(),
        ));
    }

    // The batch driver splits discovery filenames on '_'
    if !config
        .mode_label
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "mode-label must contain only alphanumeric characters and hyphens, got '{}'",
            config.mode_label
        )));
    }

    Ok(())
}

/// Validates post fetching configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    validate_page_size("fetch", config.page_size)
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_page_size(section: &str, page_size: u32) -> Result<(), ConfigError> {
    if page_size < 1 || page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::Validation(format!(
            "{}.page-size must be between 1 and {}, got {}",
            section, MAX_PAGE_SIZE, page_size
        )));
    }
    Ok(())
}
