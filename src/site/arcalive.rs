//! Arca.live adapter
//!
//! Channels are listed under `/b/{board}` with query parameters in the
//! site's own order (category, then best-mode, then page). Listing rows are
//! `a.vrow` anchors; a row qualifies when it carries a photo icon or a
//! best-star marker. Detail-page images are protocol-relative references
//! into the `namu.la` CDN; the original asset is reached by prefixing the
//! scheme.

use crate::config::CrawlRequest;
use crate::site::{
    element_text, media_source, parse_base_url, parse_selector, ArticleSeed, MediaRule,
    SelectorSpec, SiteAdapter, SiteDescriptor, SiteId, SiteResult,
};
use scraper::{Html, Selector};
use url::form_urlencoded;

/// Canonical site base URL
pub const BASE_URL: &str = "https://arca.live";

/// Required substring of a qualifying media reference
const MEDIA_HOST_MARKER: &str = "namu.la";

const ARTICLE_ROW: &str = "a.vrow";
const MARKER_PHOTO: &str = "span.ion-ios-photos-outline";
const MARKER_BEST: &str = "span.ion-android-star";
const ARTICLE_TITLE: &str = "span.title";

const MEDIA_IMAGES: &str = ".article-body .fr-view.article-content img:not(.arca-emoticon)";

/// Site adapter for Arca.live channels
pub struct Arcalive {
    descriptor: SiteDescriptor,
    default_spec: SelectorSpec,
    best_spec: SelectorSpec,
    media_rule: MediaRule,
    title_selector: Selector,
}

impl Arcalive {
    /// Creates the adapter with the canonical site endpoint
    pub fn new() -> SiteResult<Self> {
        Self::with_base(parse_base_url(BASE_URL)?)
    }

    /// Creates the adapter against a custom endpoint, e.g. a local relay
    pub fn with_base(base_url: url::Url) -> SiteResult<Self> {
        Ok(Self {
            descriptor: SiteDescriptor {
                id: SiteId::Arcalive,
                base_url,
                lazy_media_rewrite: false,
            },
            default_spec: SelectorSpec {
                entry: parse_selector(ARTICLE_ROW)?,
                markers: vec![parse_selector(MARKER_PHOTO)?, parse_selector(MARKER_BEST)?],
            },
            best_spec: SelectorSpec {
                entry: parse_selector(ARTICLE_ROW)?,
                markers: vec![parse_selector(MARKER_BEST)?],
            },
            media_rule: MediaRule {
                selector: parse_selector(MEDIA_IMAGES)?,
                attr: "src",
            },
            title_selector: parse_selector(ARTICLE_TITLE)?,
        })
    }

    /// Normalizes a found reference into an absolute asset URL
    ///
    /// Only references into the media CDN qualify; protocol-relative ones
    /// get the scheme prefixed, already-absolute ones pass through.
    fn normalize_media_url(raw: &str) -> Option<String> {
        if !raw.contains(MEDIA_HOST_MARKER) {
            return None;
        }
        if let Some(rest) = raw.strip_prefix("//") {
            Some(format!("https://{}", rest))
        } else if raw.starts_with("http://") || raw.starts_with("https://") {
            Some(raw.to_string())
        } else {
            None
        }
    }
}

impl SiteAdapter for Arcalive {
    fn descriptor(&self) -> &SiteDescriptor {
        &self.descriptor
    }

    fn build_list_url(&self, request: &CrawlRequest, page: u32) -> String {
        let base = self.descriptor.base_url.as_str().trim_end_matches('/');

        // Parameter order matters to the site: category, mode, page
        let mut params = Vec::new();
        if let Some(category) = request.category_filter() {
            let encoded: String = form_urlencoded::byte_serialize(category.as_bytes()).collect();
            params.push(format!("category={}", encoded));
        }
        if request.best_only {
            params.push("mode=best".to_string());
        }
        params.push(format!("p={}", page));

        format!("{}/b/{}?{}", base, request.board, params.join("&"))
    }

    fn select_articles(&self, request: &CrawlRequest) -> &SelectorSpec {
        if request.best_only {
            &self.best_spec
        } else {
            &self.default_spec
        }
    }

    fn extract_articles(&self, html: &Html, spec: &SelectorSpec) -> Vec<ArticleSeed> {
        spec.qualifying_rows(html)
            .into_iter()
            .filter_map(|row| {
                let href = row.value().attr("href")?;
                let url = self.descriptor.base_url.join(href).ok()?;
                let title = row
                    .select(&self.title_selector)
                    .next()
                    .map(|span| element_text(&span))
                    .unwrap_or_default();
                Some(ArticleSeed {
                    title,
                    url: url.to_string(),
                })
            })
            .collect()
    }

    fn extract_media(&self, html: &Html) -> Vec<String> {
        html.select(&self.media_rule.selector)
            .filter_map(|element| {
                let src = media_source(
                    &element,
                    self.media_rule.attr,
                    self.descriptor.lazy_media_rewrite,
                )?;
                Self::normalize_media_url(src)
            })
            .collect()
    }
}
