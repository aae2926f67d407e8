//! Coursevania adapter (coursevania.com)
//!
//! A WordPress theme that has restructured its course grid more than once.
//! Listing extraction tries a ladder of heading-anchor selectors and keeps
//! the first one that matches more than a single element, which filters out
//! navigation links that happen to share a rule.

use crate::render::PageRenderer;
use crate::sources::extract::{
    element_text, href_url, image_url, parse_selector, resolve_with_ladder, walk_listing,
};
use crate::sources::{CandidateItem, SiteAdapter, Source};
use async_trait::async_trait;
use scraper::{ElementRef, Html};
use url::Url;

const BASE: &str = "https://coursevania.com";

const LISTING_RULES: &[&str] = &[
    "article h2 a",
    "article h3 a",
    ".course-item h2 a",
    ".entry-title a",
    "h2.course-title a",
    ".wp-block-post h2 a",
];

const RESOLVE_RULES: &[&str] = &[
    r#"a[href*="udemy.com/course"]"#,
    ".coupon-btn a",
    r#"a.btn[href*="udemy"]"#,
    ".wp-block-button a",
    r#"a[href*="udemy"]"#,
];

pub struct CoursevaniaAdapter;

impl CoursevaniaAdapter {
    fn page_url(page: u32) -> Option<Url> {
        let raw = if page == 1 {
            format!("{}/courses/", BASE)
        } else {
            format!("{}/courses/page/{}/", BASE, page)
        };
        Url::parse(&raw).ok()
    }

    /// Finds the thumbnail for a heading anchor by walking up to its card
    /// container (article or list item) and taking its first `<img>`
    fn card_image(anchor: &ElementRef, base: &Url) -> Option<Url> {
        let img_sel = parse_selector("img")?;

        for node in anchor.ancestors() {
            let Some(container) = ElementRef::wrap(node) else {
                continue;
            };
            let name = container.value().name();
            if name == "article" || name == "li" {
                return container
                    .select(&img_sel)
                    .next()
                    .and_then(|img| image_url(&img, base));
            }
        }
        None
    }

    fn extract_listing(doc: &Html) -> Vec<CandidateItem> {
        let base = match Url::parse(BASE) {
            Ok(u) => u,
            Err(_) => return Vec::new(),
        };

        for rule in LISTING_RULES {
            let Some(selector) = parse_selector(rule) else {
                continue;
            };
            let anchors: Vec<_> = doc.select(&selector).collect();
            // A single match is usually a nav link, not the course grid
            if anchors.len() <= 1 {
                continue;
            }

            let items: Vec<CandidateItem> = anchors
                .iter()
                .filter_map(|anchor| {
                    let title = element_text(anchor);
                    let detail_link = href_url(anchor, &base)?;
                    if title.is_empty() {
                        return None;
                    }
                    Some(CandidateItem {
                        title,
                        detail_link,
                        image: Self::card_image(anchor, &base),
                        source: Source::Coursevania,
                    })
                })
                .collect();

            if !items.is_empty() {
                return items;
            }
        }

        Vec::new()
    }
}

#[async_trait]
impl SiteAdapter for CoursevaniaAdapter {
    fn source(&self) -> Source {
        Source::Coursevania
    }

    async fn list_candidates(&self, renderer: &dyn PageRenderer, pages: u32) -> Vec<CandidateItem> {
        walk_listing(
            renderer,
            self.source(),
            pages,
            Self::page_url,
            Self::extract_listing,
        )
        .await
    }

    async fn resolve_target(&self, renderer: &dyn PageRenderer, detail_link: &Url) -> Option<Url> {
        resolve_with_ladder(renderer, detail_link, RESOLVE_RULES, "udemy.com").await
    }
}
