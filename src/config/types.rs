use crate::site::SiteId;
use serde::Deserialize;

/// Main configuration structure for MediaMason
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub request: CrawlRequest,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
}

/// One crawl invocation. Constructed once, never mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlRequest {
    /// Which supported site to crawl
    pub site: SiteId,

    /// Board/gallery/channel identifier on that site
    pub board: String,

    /// How many articles to collect (1..=500)
    #[serde(rename = "article-count", default = "default_article_count")]
    pub article_count: u32,

    /// Listing page to start from (1..=9999)
    #[serde(rename = "start-page", default = "default_start_page")]
    pub start_page: u32,

    /// Category/head filter token; empty string means no filter.
    /// Opaque per-site: a numeric head id on DCInside, a category name
    /// on Arca.live.
    #[serde(default)]
    pub category: String,

    /// Restrict to recommended/best articles only
    #[serde(rename = "best-only", default)]
    pub best_only: bool,

    /// Summed category code for DCInside's aggregated `dcbest` board.
    /// Ignored everywhere else.
    #[serde(rename = "aggregate-mask", default = "default_aggregate_mask")]
    pub aggregate_mask: u32,
}

impl CrawlRequest {
    /// Returns the category filter token, or None when unfiltered
    pub fn category_filter(&self) -> Option<&str> {
        if self.category.is_empty() {
            None
        } else {
            Some(&self.category)
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of in-flight retrievals per batch (1..=20)
    #[serde(rename = "concurrent-requests", default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Hard ceiling on listing pages visited beyond the start page
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// User-agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Optional forward proxy every request is routed through
    #[serde(rename = "proxy-url", default)]
    pub proxy_url: Option<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrent_requests: default_concurrent_requests(),
            max_pages: default_max_pages(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            proxy_url: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the gallery sink writes retrieved assets into
    pub directory: String,

    /// Filename of the generated markdown gallery index
    #[serde(rename = "index-filename", default = "default_index_filename")]
    pub index_filename: String,
}

fn default_article_count() -> u32 {
    20
}

fn default_start_page() -> u32 {
    1
}

fn default_aggregate_mask() -> u32 {
    1
}

fn default_concurrent_requests() -> usize {
    5
}

fn default_max_pages() -> u32 {
    100
}

fn default_user_agent() -> String {
    format!("MediaMason/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_index_filename() -> String {
    "index.md".to_string()
}
