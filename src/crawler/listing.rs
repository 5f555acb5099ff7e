//! Paginated listing discovery
//!
//! Walks listing pages from the requested start page until enough articles
//! are collected or a termination condition fires: a hard page ceiling, a
//! streak of three consecutive empty pages (end of pagination assumed), or
//! the page going away mid-crawl. A missing start page is a graceful empty
//! result, not an error; the same absence on a later page keeps whatever
//! was already collected.

use crate::config::{CrawlRequest, CrawlerConfig};
use crate::crawler::fetcher::{fetch_page, FetchOutcome};
use crate::crawler::media::MediaReference;
use crate::site::SiteAdapter;
use crate::{MasonError, Result};
use reqwest::Client;
use scraper::Html;

/// Consecutive empty listing pages tolerated before assuming the end of
/// pagination. Filtered boards can legitimately produce empty pages in the
/// middle of their range.
const EMPTY_PAGE_STREAK_LIMIT: u32 = 3;

/// One collected article, in listing discovery order
///
/// `media` is attached later by the aggregator; everything else is
/// read-only after collection.
#[derive(Debug, Clone)]
pub struct ArticleRecord {
    /// Position in the final collection, equal to discovery order
    pub ordinal: usize,

    /// Listing entry title text
    pub title: String,

    /// Canonical absolute detail-page URL
    pub url: String,

    /// Media references extracted from the detail page
    pub media: Vec<MediaReference>,
}

/// Collects up to `request.article_count` qualifying articles
///
/// # Returns
///
/// * `Ok(records)` - collected articles in listing order; empty only for a
///   graceful start-page absence
/// * `Err(MasonError::HttpStatus)` - a listing page answered with a hard
///   failure status
/// * `Err(MasonError::NoContentFound)` - the loop terminated with nothing
///   collected
pub async fn crawl_listing(
    client: &Client,
    adapter: &dyn SiteAdapter,
    request: &CrawlRequest,
    limits: &CrawlerConfig,
) -> Result<Vec<ArticleRecord>> {
    let spec = adapter.select_articles(request);
    let target = request.article_count as usize;
    let page_ceiling = request.start_page + limits.max_pages;

    let mut collected: Vec<ArticleRecord> = Vec::new();
    let mut page = request.start_page;
    let mut empty_streak = 0u32;
    let mut first_page = true;

    while collected.len() < target && page < page_ceiling {
        let url = adapter.build_list_url(request, page);
        tracing::debug!("Fetching listing page {}: {}", page, url);

        match fetch_page(client, &url).await {
            FetchOutcome::Success { body } => {
                first_page = false;
                let html = Html::parse_document(&body);
                let seeds = adapter.extract_articles(&html, spec);

                if seeds.is_empty() {
                    empty_streak += 1;
                    tracing::debug!(
                        "Page {} had no qualifying entries (streak {})",
                        page,
                        empty_streak
                    );
                    if empty_streak >= EMPTY_PAGE_STREAK_LIMIT {
                        tracing::info!("No more articles, assuming end of pagination");
                        break;
                    }
                } else {
                    empty_streak = 0;
                    let remaining = target - collected.len();
                    for seed in seeds.into_iter().take(remaining) {
                        collected.push(ArticleRecord {
                            ordinal: collected.len(),
                            title: seed.title,
                            url: seed.url,
                            media: Vec::new(),
                        });
                    }
                    tracing::info!(
                        "Page {}: collected {}/{} articles",
                        page,
                        collected.len(),
                        target
                    );
                }
            }
            FetchOutcome::NotFound | FetchOutcome::Aborted { .. } => {
                if first_page {
                    tracing::info!("Listing start page absent, returning empty result");
                    return Ok(Vec::new());
                }
                tracing::info!("Listing page {} gone, keeping partial result", page);
                break;
            }
            FetchOutcome::HttpStatus { status } => {
                return Err(MasonError::HttpStatus { url, status });
            }
        }

        page += 1;
    }

    if collected.is_empty() {
        return Err(MasonError::NoContentFound);
    }

    Ok(collected)
}
