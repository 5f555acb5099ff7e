//! MediaMason: an image-board media aggregator
//!
//! This crate crawls paginated listing pages on supported board sites,
//! follows each qualifying article to its detail page, extracts image and
//! video references, and retrieves the assets under a bounded-concurrency
//! batch discipline, streaming progressively assembled batches to a
//! pluggable rendering sink.

pub mod config;
pub mod crawler;
pub mod render;
pub mod site;

use thiserror::Error;

/// Main error type for MediaMason operations
#[derive(Debug, Error)]
pub enum MasonError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Site adapter error: {0}")]
    Site(#[from] site::SiteError),

    #[error("Render sink error: {0}")]
    Render(#[from] render::RenderError),

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("No qualifying articles found")]
    NoContentFound,

    #[error("Media fetch failed for {url}: {reason}")]
    MediaFetch { url: String, reason: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

/// Result type alias for MediaMason operations
pub type Result<T> = std::result::Result<T, MasonError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, CrawlRequest, CrawlerConfig, SiteId};
pub use crawler::{crawl, CrawlResult, ProgressState};
pub use render::{RenderCard, RenderSink};
pub use site::{adapter_for, SiteAdapter, SiteDescriptor};
