//! Configuration validation
//!
//! Range checks mirror the limits the supported sites accept: up to 500
//! articles per invocation, start pages up to 9999, and a hard listing-page
//! ceiling to stop runaway pagination.

use crate::config::types::{Config, CrawlRequest, CrawlerConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Maximum number of articles a single invocation may collect
pub const MAX_ARTICLE_COUNT: u32 = 500;

/// Maximum accepted start page
pub const MAX_START_PAGE: u32 = 9999;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_request(&config.request)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the crawl request
fn validate_request(request: &CrawlRequest) -> Result<(), ConfigError> {
    if request.board.is_empty() {
        return Err(ConfigError::Validation("board cannot be empty".to_string()));
    }

    if request.board.chars().any(|c| c.is_whitespace()) {
        return Err(ConfigError::Validation(format!(
            "board must not contain whitespace, got '{}'",
            request.board
        )));
    }

    if request.article_count < 1 || request.article_count > MAX_ARTICLE_COUNT {
        return Err(ConfigError::Validation(format!(
            "article-count must be between 1 and {}, got {}",
            MAX_ARTICLE_COUNT, request.article_count
        )));
    }

    if request.start_page < 1 || request.start_page > MAX_START_PAGE {
        return Err(ConfigError::Validation(format!(
            "start-page must be between 1 and {}, got {}",
            MAX_START_PAGE, request.start_page
        )));
    }

    if request.aggregate_mask < 1 {
        return Err(ConfigError::Validation(
            "aggregate-mask must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.concurrent_requests < 1 || config.concurrent_requests > 20 {
        return Err(ConfigError::Validation(format!(
            "concurrent-requests must be between 1 and 20, got {}",
            config.concurrent_requests
        )));
    }

    if config.max_pages < 1 || config.max_pages > 1000 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be between 1 and 1000, got {}",
            config.max_pages
        )));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if let Some(proxy) = &config.proxy_url {
        Url::parse(proxy)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy-url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.index_filename.is_empty() {
        return Err(ConfigError::Validation(
            "index-filename cannot be empty".to_string(),
        ));
    }

    Ok(())
}
