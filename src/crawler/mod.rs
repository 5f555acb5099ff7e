//! Crawler module: the crawl-aggregate pipeline
//!
//! This module contains the core pipeline, including:
//! - HTTP fetching and outcome classification
//! - Paginated listing discovery with termination heuristics
//! - Per-article media extraction
//! - The bounded-concurrency batch scheduler
//! - Order-preserving result assembly with progress accounting

mod aggregator;
mod batch;
mod fetcher;
mod listing;
mod media;

pub use aggregator::{crawl, CrawlResult, ProgressState};
pub use batch::{chunked, run_batched, run_batched_with_hook};
pub use fetcher::{build_http_client, fetch_bytes, fetch_page, FetchOutcome, FetchedAsset};
pub use listing::{crawl_listing, ArticleRecord};
pub use media::{extract_media_for, MediaReference};
