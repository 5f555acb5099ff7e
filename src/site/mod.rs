//! Site adapters for the supported board sites
//!
//! Everything that differs between sites lives behind the [`SiteAdapter`]
//! trait: listing-URL construction, the markup rules that identify
//! qualifying listing entries, and the rules that turn detail-page markup
//! into absolute media URLs. The rest of the pipeline never branches on
//! which site it is crawling.

mod arcalive;
mod dcinside;

pub use arcalive::Arcalive;
pub use dcinside::Dcinside;

use crate::config::CrawlRequest;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;
use url::Url;

/// Errors raised while constructing a site adapter
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Invalid site base URL '{url}': {message}")]
    BaseUrl { url: String, message: String },
}

/// Result type alias for site adapter operations
pub type SiteResult<T> = std::result::Result<T, SiteError>;

/// Identifier for a supported site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteId {
    Dcinside,
    Arcalive,
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteId::Dcinside => write!(f, "dcinside"),
            SiteId::Arcalive => write!(f, "arcalive"),
        }
    }
}

/// Immutable per-site facts, constructed once per adapter
#[derive(Debug, Clone)]
pub struct SiteDescriptor {
    /// Which site this adapter serves
    pub id: SiteId,

    /// Base URL relative listing/article links resolve against
    pub base_url: Url,

    /// Whether detail pages carry lazy placeholder media elements whose
    /// genuine source lives in a secondary attribute
    pub lazy_media_rewrite: bool,
}

/// A markup rule identifying qualifying listing entries
///
/// A row qualifies when it matches `entry` and, if `markers` is non-empty,
/// contains at least one element matching a marker selector. Markers stand
/// in for `:has()` child conditions, which CSS-level selectors here cannot
/// express.
#[derive(Debug, Clone)]
pub struct SelectorSpec {
    pub entry: Selector,
    pub markers: Vec<Selector>,
}

impl SelectorSpec {
    /// Returns the listing rows qualifying under this spec, in document order
    pub fn qualifying_rows<'a>(&self, html: &'a Html) -> Vec<ElementRef<'a>> {
        html.select(&self.entry)
            .filter(|row| {
                self.markers.is_empty()
                    || self
                        .markers
                        .iter()
                        .any(|marker| row.select(marker).next().is_some())
            })
            .collect()
    }
}

/// One (selector, attribute) media extraction rule
#[derive(Debug, Clone)]
pub struct MediaRule {
    pub selector: Selector,
    pub attr: &'static str,
}

/// A listing entry as extracted by an adapter: title text plus the
/// resolved absolute detail-page URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleSeed {
    pub title: String,
    pub url: String,
}

/// Per-site behavior behind one contract
///
/// Implementations must be stateless after construction so one adapter can
/// serve a whole crawl invocation.
pub trait SiteAdapter: Send + Sync {
    /// Immutable facts about the site
    fn descriptor(&self) -> &SiteDescriptor;

    /// Builds the listing-page URL for the given request and page number.
    /// Pure function of its inputs.
    fn build_list_url(&self, request: &CrawlRequest, page: u32) -> String;

    /// Chooses the qualifying-entry rule set for the request's filter
    /// combination
    fn select_articles(&self, request: &CrawlRequest) -> &SelectorSpec;

    /// Extracts qualifying listing entries, resolving relative links
    /// against the site base URL
    fn extract_articles(&self, html: &Html, spec: &SelectorSpec) -> Vec<ArticleSeed>;

    /// Extracts normalized absolute media URLs from detail-page markup
    fn extract_media(&self, html: &Html) -> Vec<String>;
}

/// Constructs the adapter for a site id
pub fn adapter_for(site: SiteId) -> SiteResult<Box<dyn SiteAdapter>> {
    match site {
        SiteId::Dcinside => Ok(Box::new(Dcinside::new()?)),
        SiteId::Arcalive => Ok(Box::new(Arcalive::new()?)),
    }
}

/// Parses a selector string, mapping failures into [`SiteError`]
pub(crate) fn parse_selector(selector: &str) -> SiteResult<Selector> {
    Selector::parse(selector).map_err(|e| SiteError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Parses a base URL string, mapping failures into [`SiteError`]
pub(crate) fn parse_base_url(url: &str) -> SiteResult<Url> {
    Url::parse(url).map_err(|e| SiteError::BaseUrl {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Reads the media source attribute from an element
///
/// When `lazy_rewrite` is set and the element is a lazy placeholder (class
/// `lazy` with a `data-original` attribute), the original attribute is read
/// in place of the requested one. This is the extraction-time equivalent of
/// rewriting the placeholder before querying it.
pub(crate) fn media_source<'a>(
    element: &ElementRef<'a>,
    attr: &str,
    lazy_rewrite: bool,
) -> Option<&'a str> {
    if lazy_rewrite && element.value().classes().any(|class| class == "lazy") {
        if let Some(original) = element.value().attr("data-original") {
            return Some(original);
        }
    }
    element.value().attr(attr)
}

/// Collects an element's text content, trimmed
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
