//! DCInside adapter
//!
//! Listing pages live under `/mgallery/board/lists/`, except the aggregated
//! best-of board `dcbest` which has a fixed path and a summed category mask
//! parameter. Detail-page images are served through an image-viewer endpoint
//! addressed by the `id` and `no` query parameters of whatever reference the
//! markup carries, so extraction rebuilds the canonical viewer URL from
//! those two values.

use crate::config::CrawlRequest;
use crate::site::{
    element_text, media_source, parse_base_url, parse_selector, ArticleSeed, MediaRule,
    SelectorSpec, SiteAdapter, SiteDescriptor, SiteId, SiteResult,
};
use scraper::Html;
use url::Url;

/// Canonical site base URL
pub const BASE_URL: &str = "https://gall.dcinside.com";

/// Canonical image-viewer endpoint media URLs are rebuilt onto
pub const IMAGE_BASE_URL: &str = "https://images.dcinside.com/viewimage.php";

/// Board id of the aggregated best-of board
pub const DCBEST_BOARD: &str = "dcbest";

const ARTICLE_GALLERY: &str = "\
    .ub-content.us-post[data-type=\"icon_pic\"] .gall_tit.ub-word a:not(.reply_numbox), \
    .ub-content.us-post[data-type=\"icon_recomimg\"] .gall_tit.ub-word a:not(.reply_numbox)";

const ARTICLE_RECOMMEND: &str =
    ".ub-content.us-post[data-type=\"icon_recomimg\"] .gall_tit.ub-word a:not(.reply_numbox)";

const ARTICLE_DCBEST: &str = ".ub-content.us-post.thum .gall_tit.ub-word a:not(.reply_numbox)";

const MEDIA_IMAGES: &str = "\
    div.view_content_wrap .writing_view_box #zzbang_div img:not(.written_dccon), \
    div.view_content_wrap .writing_view_box .write_div img:not(.written_dccon):not(.og-img)";

const MEDIA_VIDEOS: &str =
    "div.view_content_wrap .writing_view_box .write_div video:not(.written_dccon)";

/// Site adapter for DCInside galleries
pub struct Dcinside {
    descriptor: SiteDescriptor,
    image_base: Url,
    gallery_spec: SelectorSpec,
    recommend_spec: SelectorSpec,
    dcbest_spec: SelectorSpec,
    media_rules: Vec<MediaRule>,
}

impl Dcinside {
    /// Creates the adapter with the canonical site endpoints
    pub fn new() -> SiteResult<Self> {
        Self::with_bases(parse_base_url(BASE_URL)?, parse_base_url(IMAGE_BASE_URL)?)
    }

    /// Creates the adapter against custom endpoints, e.g. a local relay
    pub fn with_bases(base_url: Url, image_base: Url) -> SiteResult<Self> {
        Ok(Self {
            descriptor: SiteDescriptor {
                id: SiteId::Dcinside,
                base_url,
                // Detail pages ship preview placeholders; the genuine
                // source sits in data-original until rewritten
                lazy_media_rewrite: true,
            },
            image_base,
            gallery_spec: SelectorSpec {
                entry: parse_selector(ARTICLE_GALLERY)?,
                markers: Vec::new(),
            },
            recommend_spec: SelectorSpec {
                entry: parse_selector(ARTICLE_RECOMMEND)?,
                markers: Vec::new(),
            },
            dcbest_spec: SelectorSpec {
                entry: parse_selector(ARTICLE_DCBEST)?,
                markers: Vec::new(),
            },
            media_rules: vec![
                MediaRule {
                    selector: parse_selector(MEDIA_IMAGES)?,
                    attr: "src",
                },
                MediaRule {
                    selector: parse_selector(MEDIA_VIDEOS)?,
                    attr: "data-src",
                },
            ],
        })
    }

    /// Rebuilds the canonical image-viewer URL from a found reference
    ///
    /// References in the markup may be relative or point at a mirror; only
    /// the `id` and `no` query parameters identify the asset. References
    /// without both parameters are dropped.
    fn normalize_media_url(&self, raw: &str) -> Option<String> {
        let parsed = Url::parse(raw)
            .or_else(|_| self.descriptor.base_url.join(raw))
            .ok()?;

        let mut id = None;
        let mut no = None;
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "id" => id = Some(value.into_owned()),
                "no" => no = Some(value.into_owned()),
                _ => {}
            }
        }

        Some(format!("{}?id={}&no={}", self.image_base, id?, no?))
    }
}

impl SiteAdapter for Dcinside {
    fn descriptor(&self) -> &SiteDescriptor {
        &self.descriptor
    }

    fn build_list_url(&self, request: &CrawlRequest, page: u32) -> String {
        let base = self.descriptor.base_url.as_str().trim_end_matches('/');

        if request.board == DCBEST_BOARD {
            return format!(
                "{}/board/lists/?id={}&page={}&_dcbest={}",
                base, DCBEST_BOARD, page, request.aggregate_mask
            );
        }

        let mut url = format!(
            "{}/mgallery/board/lists/?id={}&page={}",
            base, request.board, page
        );
        if let Some(category) = request.category_filter() {
            url.push_str(&format!("&sort_type=N&search_head={}", category));
        }
        if request.best_only {
            url.push_str("&exception_mode=recommend");
        }
        url
    }

    fn select_articles(&self, request: &CrawlRequest) -> &SelectorSpec {
        if request.board == DCBEST_BOARD {
            &self.dcbest_spec
        } else if request.best_only {
            &self.recommend_spec
        } else {
            &self.gallery_spec
        }
    }

    fn extract_articles(&self, html: &Html, spec: &SelectorSpec) -> Vec<ArticleSeed> {
        spec.qualifying_rows(html)
            .into_iter()
            .filter_map(|anchor| {
                let href = anchor.value().attr("href")?;
                let url = self.descriptor.base_url.join(href).ok()?;
                Some(ArticleSeed {
                    title: element_text(&anchor),
                    url: url.to_string(),
                })
            })
            .collect()
    }

    fn extract_media(&self, html: &Html) -> Vec<String> {
        let mut media = Vec::new();
        for rule in &self.media_rules {
            for element in html.select(&rule.selector) {
                let Some(src) =
                    media_source(&element, rule.attr, self.descriptor.lazy_media_rewrite)
                else {
                    continue;
                };
                if let Some(url) = self.normalize_media_url(src) {
                    media.push(url);
                }
            }
        }
        media
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> Dcinside {
        Dcinside::new().unwrap()
    }

    fn request(board: &str) -> CrawlRequest {
        CrawlRequest {
            site: SiteId::Dcinside,
            board: board.to_string(),
            article_count: 20,
            start_page: 1,
            category: String::new(),
            best_only: false,
            aggregate_mask: 1,
        }
    }

    #[test]
    fn test_build_list_url_plain() {
        let url = adapter().build_list_url(&request("programming"), 3);
        assert_eq!(
            url,
            "https://gall.dcinside.com/mgallery/board/lists/?id=programming&page=3"
        );
    }

    #[test]
    fn test_build_list_url_with_category() {
        let mut req = request("programming");
        req.category = "12".to_string();

        let url = adapter().build_list_url(&req, 1);
        assert_eq!(
            url,
            "https://gall.dcinside.com/mgallery/board/lists/?id=programming&page=1&sort_type=N&search_head=12"
        );
        // The category token appears exactly once
        assert_eq!(url.matches("search_head").count(), 1);
        assert!(!url.contains("exception_mode"));
    }

    #[test]
    fn test_build_list_url_best_only() {
        let mut req = request("programming");
        req.best_only = true;

        let url = adapter().build_list_url(&req, 2);
        assert!(url.ends_with("&exception_mode=recommend"));
    }

    #[test]
    fn test_build_list_url_dcbest_uses_fixed_path_and_mask() {
        let mut req = request(DCBEST_BOARD);
        req.aggregate_mask = 13;

        let url = adapter().build_list_url(&req, 4);
        assert_eq!(
            url,
            "https://gall.dcinside.com/board/lists/?id=dcbest&page=4&_dcbest=13"
        );
    }

    #[test]
    fn test_select_articles_variants() {
        let adapter = adapter();

        let default_spec = adapter.select_articles(&request("programming"));
        assert!(std::ptr::eq(default_spec, &adapter.gallery_spec));

        let mut best = request("programming");
        best.best_only = true;
        assert!(std::ptr::eq(
            adapter.select_articles(&best),
            &adapter.recommend_spec
        ));

        assert!(std::ptr::eq(
            adapter.select_articles(&request(DCBEST_BOARD)),
            &adapter.dcbest_spec
        ));
    }

    const LISTING: &str = r##"
        <table>
        <tr class="ub-content us-post" data-type="icon_pic">
            <td class="gall_tit ub-word">
                <a href="/mgallery/board/view/?id=programming&no=101">First post</a>
                <a class="reply_numbox" href="#">[3]</a>
            </td>
        </tr>
        <tr class="ub-content us-post" data-type="icon_txt">
            <td class="gall_tit ub-word">
                <a href="/mgallery/board/view/?id=programming&no=102">Text only</a>
            </td>
        </tr>
        <tr class="ub-content us-post" data-type="icon_recomimg">
            <td class="gall_tit ub-word">
                <a href="/mgallery/board/view/?id=programming&no=103">Recommended pic</a>
            </td>
        </tr>
        </table>
    "##;

    #[test]
    fn test_extract_articles_default_includes_pic_and_recommended() {
        let adapter = adapter();
        let html = Html::parse_document(LISTING);
        let articles = adapter.extract_articles(&html, &adapter.gallery_spec);

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "First post");
        assert_eq!(
            articles[0].url,
            "https://gall.dcinside.com/mgallery/board/view/?id=programming&no=101"
        );
        assert_eq!(articles[1].title, "Recommended pic");
    }

    #[test]
    fn test_extract_articles_recommend_only() {
        let adapter = adapter();
        let html = Html::parse_document(LISTING);
        let articles = adapter.extract_articles(&html, &adapter.recommend_spec);

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Recommended pic");
    }

    #[test]
    fn test_extract_media_rebuilds_viewer_url() {
        let adapter = adapter();
        let html = Html::parse_document(
            r#"<div class="view_content_wrap"><div class="writing_view_box"><div class="write_div">
                <img src="https://dcimg1.dcinside.com/viewimage.php?id=aaa111&no=bbb222&orgExt">
            </div></div></div>"#,
        );

        let media = adapter.extract_media(&html);
        assert_eq!(
            media,
            vec!["https://images.dcinside.com/viewimage.php?id=aaa111&no=bbb222"]
        );
    }

    #[test]
    fn test_extract_media_reads_lazy_original_attribute() {
        let adapter = adapter();
        let html = Html::parse_document(
            r#"<div class="view_content_wrap"><div class="writing_view_box"><div class="write_div">
                <img class="lazy" src="/preview/thumb.webp"
                     data-original="https://dcimg1.dcinside.com/viewimage.php?id=lazy1&no=lazy2">
            </div></div></div>"#,
        );

        let media = adapter.extract_media(&html);
        assert_eq!(
            media,
            vec!["https://images.dcinside.com/viewimage.php?id=lazy1&no=lazy2"]
        );
    }

    #[test]
    fn test_extract_media_video_data_src() {
        let adapter = adapter();
        let html = Html::parse_document(
            r#"<div class="view_content_wrap"><div class="writing_view_box"><div class="write_div">
                <video data-src="https://dcimg1.dcinside.com/viewimage.php?id=vid1&no=vid2"></video>
            </div></div></div>"#,
        );

        let media = adapter.extract_media(&html);
        assert_eq!(
            media,
            vec!["https://images.dcinside.com/viewimage.php?id=vid1&no=vid2"]
        );
    }

    #[test]
    fn test_extract_media_skips_dccon_and_og_images() {
        let adapter = adapter();
        let html = Html::parse_document(
            r#"<div class="view_content_wrap"><div class="writing_view_box"><div class="write_div">
                <img class="written_dccon" src="https://x/viewimage.php?id=a&no=b">
                <img class="og-img" src="https://x/viewimage.php?id=c&no=d">
            </div></div></div>"#,
        );

        assert!(adapter.extract_media(&html).is_empty());
    }

    #[test]
    fn test_extract_media_drops_references_without_id_or_no() {
        let adapter = adapter();
        let html = Html::parse_document(
            r#"<div class="view_content_wrap"><div class="writing_view_box"><div class="write_div">
                <img src="https://dcimg1.dcinside.com/viewimage.php?id=only-id">
            </div></div></div>"#,
        );

        assert!(adapter.extract_media(&html).is_empty());
    }
}
