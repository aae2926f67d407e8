//! OnlineCourses adapter (onlinecourses.ooo)
//!
//! A WordPress site: listing items are `article.col_item` blocks with a
//! heading anchor; detail pages link out through wp-block or Elementor
//! buttons.

use crate::render::PageRenderer;
use crate::sources::extract::{
    element_text, href_url, image_url, parse_selector, resolve_with_ladder, walk_listing,
};
use crate::sources::{CandidateItem, SiteAdapter, Source};
use async_trait::async_trait;
use scraper::Html;
use url::Url;

const BASE: &str = "https://www.onlinecourses.ooo";

const RESOLVE_RULES: &[&str] = &[
    r#"a[href*="udemy.com/course"]"#,
    ".wp-block-button a",
    r#"a.elementor-button[href*="udemy"]"#,
    ".elementor-button-wrapper a",
    r#"a[href*="udemy"]"#,
];

/// Below this many col_item articles, broaden to any article heading
const FALLBACK_THRESHOLD: usize = 2;

pub struct OnlineCoursesAdapter;

impl OnlineCoursesAdapter {
    fn page_url(page: u32) -> Option<Url> {
        let raw = if page == 1 {
            format!("{}/", BASE)
        } else {
            format!("{}/page/{}/", BASE, page)
        };
        Url::parse(&raw).ok()
    }

    fn extract_with(
        doc: &Html,
        base: &Url,
        article_rule: &str,
        items: &mut Vec<CandidateItem>,
    ) {
        let (Some(article_sel), Some(link_sel), Some(img_sel)) = (
            parse_selector(article_rule),
            parse_selector("h2 a, h3 a"),
            parse_selector(r#"img[src*="udemycdn"], img[src*="udemy"], img"#),
        ) else {
            return;
        };

        for article in doc.select(&article_sel) {
            let Some(link) = article.select(&link_sel).next() else {
                continue;
            };
            let title = element_text(&link);
            let Some(detail_link) = href_url(&link, base) else {
                continue;
            };
            if title.is_empty() {
                continue;
            }
            if items
                .iter()
                .any(|c: &CandidateItem| c.detail_link == detail_link)
            {
                continue;
            }
            let image = article
                .select(&img_sel)
                .next()
                .and_then(|img| image_url(&img, base));

            items.push(CandidateItem {
                title,
                detail_link,
                image,
                source: Source::OnlineCourses,
            });
        }
    }

    fn extract_listing(doc: &Html) -> Vec<CandidateItem> {
        let base = match Url::parse(BASE) {
            Ok(u) => u,
            Err(_) => return Vec::new(),
        };

        let mut items = Vec::new();
        Self::extract_with(doc, &base, "article.col_item", &mut items);
        if items.len() < FALLBACK_THRESHOLD {
            Self::extract_with(doc, &base, "article", &mut items);
        }
        items
    }
}

#[async_trait]
impl SiteAdapter for OnlineCoursesAdapter {
    fn source(&self) -> Source {
        Source::OnlineCourses
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_col_items() {
        let html = r#"
            <html><body>
            <article class="col_item">
                <h2><a href="/course/docker-deep-dive/">Docker Deep Dive</a></h2>
                <img src="https://img-c.udemycdn.com/course/docker.jpg">
            </article>
            <article class="col_item">
                <h3><a href="https://www.onlinecourses.ooo/course/git-basics/">Git Basics</a></h3>
            </article>
            </body></html>
        "#;
        let doc = Html::parse_document(html);
        let items = OnlineCoursesAdapter::extract_listing(&doc);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Docker Deep Dive");
        assert_eq!(
            items[0].image.as_ref().unwrap().as_str(),
            "https://img-c.udemycdn.com/course/docker.jpg"
        );
        assert_eq!(
            items[1].detail_link.as_str(),
            "https://www.onlinecourses.ooo/course/git-basics/"
        );
    }

    #[test]
    fn test_broadens_to_plain_articles() {
        let html = r#"
            <html><body>
            <article><h2><a href="/course/one/">One</a></h2></article>
            <article><h2><a href="/course/two/">Two</a></h2></article>
            </body></html>
        "#;
        let doc = Html::parse_document(html);
        let items = OnlineCoursesAdapter::extract_listing(&doc);

        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_no_duplicate_links_across_strategies() {
        let html = r#"
            <html><body>
            <article class="col_item"><h2><a href="/course/one/">One</a></h2></article>
            </body></html>
        "#;
        let doc = Html::parse_document(html);
        let items = OnlineCoursesAdapter::extract_listing(&doc);

        // One col_item triggers the broadened pass, which must not re-add it
        assert_eq!(items.len(), 1);
    }
}
