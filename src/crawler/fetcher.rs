//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the pipeline, including:
//! - Building the HTTP client with user agent, timeouts, and optional proxy
//! - Fetching page markup with outcome classification
//! - Fetching raw asset bytes for the rendering phase
//!
//! Outcome classification follows one rule everywhere: 404 and transport
//! failures are the graceful "gone" path, any other non-success status is a
//! hard error the caller decides about.

use crate::config::CrawlerConfig;
use crate::{MasonError, Result};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Result of fetching one page of markup
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched the page body
    Success { body: String },

    /// The page does not exist (HTTP 404)
    NotFound,

    /// The retrieval was cut short at the transport level
    /// (connect failure, timeout, interrupted body)
    Aborted { reason: String },

    /// Any other non-success HTTP status
    HttpStatus { status: u16 },
}

/// A retrieved media asset
#[derive(Debug, Clone)]
pub struct FetchedAsset {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Builds the HTTP client the whole pipeline shares
///
/// # Arguments
///
/// * `config` - Crawler configuration carrying the user agent, timeout,
///   and optional forward proxy
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = &config.proxy_url {
        builder = builder.proxy(reqwest::Proxy::all(proxy)?);
    }

    Ok(builder.build()?)
}

/// Fetches a page and classifies the outcome
///
/// Never fails: every possible result maps to a [`FetchOutcome`] variant
/// and the caller decides which variants are fatal in its context. A
/// listing treats `HttpStatus` as fatal; a detail page degrades every
/// non-success outcome to an empty media list.
pub async fn fetch_page(client: &Client, url: &str) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            return FetchOutcome::Aborted {
                reason: e.to_string(),
            }
        }
    };

    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return FetchOutcome::NotFound;
    }

    if !status.is_success() {
        return FetchOutcome::HttpStatus {
            status: status.as_u16(),
        };
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Success { body },
        // Body cut off mid-transfer; same graceful path as an abort
        Err(e) => FetchOutcome::Aborted {
            reason: e.to_string(),
        },
    }
}

/// Fetches raw asset bytes for one media reference
///
/// Unlike [`fetch_page`] this returns a hard error on any failure; the
/// batch scheduler isolates it to a placeholder for the one unit.
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<FetchedAsset> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(MasonError::MediaFetch {
            url: url.to_string(),
            reason: format!("HTTP {}", status.as_u16()),
        });
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    let bytes = response.bytes().await?.to_vec();

    Ok(FetchedAsset {
        bytes,
        content_type,
    })
}
