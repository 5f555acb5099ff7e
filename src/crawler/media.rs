//! Per-article media extraction
//!
//! Retrieves one article's detail page and extracts normalized media
//! references through the site adapter. A single article's failure never
//! aborts the batch: every non-success retrieval degrades to an empty
//! list.

use crate::crawler::fetcher::{fetch_page, FetchOutcome};
use crate::site::SiteAdapter;
use reqwest::Client;
use scraper::Html;

/// One resolved absolute URL to an image or video asset, owned by exactly
/// one article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaReference {
    pub url: String,
}

/// Extracts the media references from one article's detail page
///
/// Lazy placeholder handling is driven by the adapter's descriptor; see
/// the adapter module. Retrieval failures of any kind (not found,
/// transport abort, hard HTTP status) yield an empty list.
pub async fn extract_media_for(
    client: &Client,
    adapter: &dyn SiteAdapter,
    article_url: &str,
) -> Vec<MediaReference> {
    match fetch_page(client, article_url).await {
        FetchOutcome::Success { body } => {
            let html = Html::parse_document(&body);
            adapter
                .extract_media(&html)
                .into_iter()
                .map(|url| MediaReference { url })
                .collect()
        }
        FetchOutcome::NotFound => {
            tracing::debug!("Detail page not found: {}", article_url);
            Vec::new()
        }
        FetchOutcome::Aborted { reason } => {
            tracing::debug!("Detail retrieval aborted for {}: {}", article_url, reason);
            Vec::new()
        }
        FetchOutcome::HttpStatus { status } => {
            tracing::warn!("Detail page {} answered HTTP {}, skipping", article_url, status);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlerConfig;
    use crate::crawler::build_http_client;
    use crate::site::Dcinside;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn adapter_against(server: &MockServer) -> Dcinside {
        let base = Url::parse(&server.uri()).unwrap();
        Dcinside::with_bases(base.clone(), base.join("/viewimage.php").unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_extract_media_for_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/article/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<div class="view_content_wrap"><div class="writing_view_box"><div class="write_div">
                    <img src="/viewimage.php?id=a1&no=n1">
                    <img src="/viewimage.php?id=a2&no=n2">
                </div></div></div>"#,
            ))
            .mount(&server)
            .await;

        let client = build_http_client(&CrawlerConfig::default()).unwrap();
        let adapter = adapter_against(&server).await;

        let media =
            extract_media_for(&client, &adapter, &format!("{}/article/1", server.uri())).await;
        assert_eq!(media.len(), 2);
        assert!(media[0].url.ends_with("/viewimage.php?id=a1&no=n1"));
    }

    #[tokio::test]
    async fn test_extract_media_for_http_error_yields_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = build_http_client(&CrawlerConfig::default()).unwrap();
        let adapter = adapter_against(&server).await;

        let media =
            extract_media_for(&client, &adapter, &format!("{}/article/1", server.uri())).await;
        assert!(media.is_empty());
    }

    #[tokio::test]
    async fn test_extract_media_for_unreachable_yields_empty() {
        let server = MockServer::start().await;
        let client = build_http_client(&CrawlerConfig::default()).unwrap();
        let adapter = adapter_against(&server).await;

        let media = extract_media_for(&client, &adapter, "http://127.0.0.1:1/article/1").await;
        assert!(media.is_empty());
    }
}
