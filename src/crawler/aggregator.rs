//! Aggregator: drives the pipeline end to end
//!
//! Listing discovery, batched media extraction, and progressive card
//! production feed one ordered result. Progress counters live here and are
//! touched through a single mutation point, so a multi-threaded port only
//! needs the atomic that is already in place.

use crate::config::{CrawlRequest, CrawlerConfig};
use crate::crawler::batch::{chunked, run_batched, run_batched_with_hook};
use crate::crawler::fetcher::fetch_bytes;
use crate::crawler::listing::{crawl_listing, ArticleRecord};
use crate::crawler::media::extract_media_for;
use crate::render::{RenderCard, RenderSink};
use crate::site::SiteAdapter;
use crate::{MasonError, Result};
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Progress accounting for the extraction/render phase
///
/// `completed` is monotonically non-decreasing, increments exactly once
/// per settled unit, and reaches `total` exactly once.
#[derive(Debug)]
pub struct ProgressState {
    total: usize,
    completed: AtomicUsize,
}

impl ProgressState {
    /// Creates progress state for a known total
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: AtomicUsize::new(0),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Records one settled unit (success or failure) and returns the new
    /// completed count. The single mutation point for the counter.
    pub fn item_settled(&self) -> usize {
        self.completed.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_complete(&self) -> bool {
        self.completed() == self.total
    }
}

/// Ordered crawl output: articles in listing discovery order, each
/// carrying its media references
#[derive(Debug)]
pub struct CrawlResult {
    pub articles: Vec<ArticleRecord>,
}

impl CrawlResult {
    /// Total number of media references across all articles
    pub fn total_media(&self) -> usize {
        self.articles.iter().map(|a| a.media.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// One flattened article-media pair awaiting card production
#[derive(Debug, Clone)]
struct RenderUnit {
    ordinal: usize,
    title: String,
    article_url: String,
    media_url: String,
}

/// Runs a complete crawl invocation
///
/// 1. Discover articles via the listing crawler; an empty listing is a
///    zero-result outcome, not an error.
/// 2. Fan out over the articles with the batch scheduler, extracting each
///    one's media and attaching it in original order.
/// 3. Flatten the article-media pairs, re-batch them at the same
///    concurrency limit, retrieve each asset, and hand every settled batch
///    of cards to the rendering sink with a layout recompute, advancing
///    the progress counter once per settled unit.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `adapter` - Site adapter for the requested site
/// * `request` - The immutable crawl request
/// * `limits` - Crawler limits (concurrency, page ceiling)
/// * `sink` - Rendering sink receiving progressive batches
pub async fn crawl(
    client: &Client,
    adapter: &dyn SiteAdapter,
    request: &CrawlRequest,
    limits: &CrawlerConfig,
    sink: &dyn RenderSink,
) -> Result<CrawlResult> {
    sink.clear()?;

    let mut articles = crawl_listing(client, adapter, request, limits).await?;
    if articles.is_empty() {
        tracing::info!("Nothing to aggregate");
        sink.set_progress(0, 0)?;
        return Ok(CrawlResult { articles });
    }

    tracing::info!("Extracting media for {} articles", articles.len());
    let urls: Vec<String> = articles.iter().map(|a| a.url.clone()).collect();
    let media_lists = run_batched(urls, limits.concurrent_requests, |url| async move {
        Ok::<_, MasonError>(extract_media_for(client, adapter, &url).await)
    })
    .await;

    for (article, media) in articles.iter_mut().zip(media_lists) {
        article.media = media;
        tracing::debug!(
            "{} ({} media items) {}",
            article.title,
            article.media.len(),
            article.url
        );
    }

    let result = CrawlResult { articles };
    let total = result.total_media();
    let progress = ProgressState::new(total);
    sink.set_progress(0, total)?;

    if total == 0 {
        tracing::info!("Collected {} articles but no media references", result.articles.len());
        return Ok(result);
    }

    let units: Vec<RenderUnit> = result
        .articles
        .iter()
        .flat_map(|article| {
            article.media.iter().map(move |media| RenderUnit {
                ordinal: article.ordinal,
                title: article.title.clone(),
                article_url: article.url.clone(),
                media_url: media.url.clone(),
            })
        })
        .collect();

    for batch in chunked(units, limits.concurrent_requests) {
        let produced: Vec<Option<RenderCard>> = run_batched_with_hook(
            batch,
            limits.concurrent_requests,
            |unit| async move {
                let asset = fetch_bytes(client, &unit.media_url).await?;
                Ok::<_, MasonError>(Some(RenderCard {
                    ordinal: unit.ordinal,
                    title: unit.title,
                    article_url: unit.article_url,
                    media_url: unit.media_url,
                    bytes: asset.bytes,
                    content_type: asset.content_type,
                }))
            },
            || {
                let completed = progress.item_settled();
                if let Err(e) = sink.set_progress(completed, total) {
                    tracing::warn!("Progress update failed: {}", e);
                }
            },
        )
        .await;

        let cards: Vec<RenderCard> = produced.into_iter().flatten().collect();
        if !cards.is_empty() {
            sink.append(&cards)?;
        }
        sink.relayout()?;
    }

    if progress.is_complete() {
        tracing::info!(
            "Crawl complete: {} articles, {} media items",
            result.articles.len(),
            total
        );
    }

    Ok(result)
}
