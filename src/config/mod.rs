//! Configuration module for MediaMason
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files describing a single crawl invocation.
//!
//! # Example
//!
//! ```no_run
//! use mediamason::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Target article count: {}", config.request.article_count);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlRequest, CrawlerConfig, OutputConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};

// Re-export the site identifier for convenience; it lives with the adapters
pub use crate::site::SiteId;
