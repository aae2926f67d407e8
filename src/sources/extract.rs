//! Shared extraction helpers for site adapters
//!
//! Adapters express their structural rules as ordered lists of CSS
//! selectors. These helpers keep the failure policy uniform: an invalid
//! selector or a non-matching rule is a skipped rule, never a panic.

use crate::render::PageRenderer;
use crate::sources::{CandidateItem, Source};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Fallback image used when a listing has no usable thumbnail
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x150?text=Premium+Course";

/// Parses a CSS selector, treating an invalid one as a non-matching rule
pub(crate) fn parse_selector(src: &str) -> Option<Selector> {
    match Selector::parse(src) {
        Ok(sel) => Some(sel),
        Err(_) => {
            tracing::warn!("Invalid selector skipped: {}", src);
            None
        }
    }
}

/// Collects and trims the text content of an element
pub(crate) fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Resolves an element's `href` against a base URL
pub(crate) fn href_url(el: &ElementRef, base: &Url) -> Option<Url> {
    let href = el.value().attr("href")?;
    if href.is_empty() {
        return None;
    }
    base.join(href).ok()
}

/// Extracts a usable image URL from an `<img>` element
///
/// Lazy-loading sites put the real URL in `data-src`/`data-lazy-src` and a
/// throwaway value in `src`, so the data attributes win. Inline `data:` URIs
/// and emoji sprites are treated as missing.
pub(crate) fn image_url(img: &ElementRef, base: &Url) -> Option<Url> {
    let raw = img
        .value()
        .attr("data-src")
        .or_else(|| img.value().attr("data-lazy-src"))
        .or_else(|| img.value().attr("src"))?;

    if raw.is_empty() || raw.starts_with("data:") || raw.contains("emoji") {
        return None;
    }

    let mut url = base.join(raw).ok()?;
    // Tracking query strings bloat the stored URL and break dedup
    url.set_query(None);
    Some(url)
}

/// Returns the stored image for a candidate, falling back to the placeholder
pub fn repair_image_url(image: Option<&Url>) -> Url {
    match image {
        Some(url) => url.clone(),
        None => Url::parse(PLACEHOLDER_IMAGE).expect("placeholder URL is valid"),
    }
}

/// Finds the first link matching an ordered selector ladder whose href
/// contains `needle`
///
/// Rules earlier in the ladder are more specific (primary call-to-action
/// buttons); later rules broaden to any matching anchor.
pub(crate) fn first_matching_link(
    doc: &Html,
    rules: &[&str],
    needle: &str,
    base: &Url,
) -> Option<Url> {
    for rule in rules {
        let Some(selector) = parse_selector(rule) else {
            continue;
        };
        for el in doc.select(&selector) {
            if let Some(url) = href_url(&el, base) {
                if url.as_str().contains(needle) {
                    return Some(url);
                }
            }
        }
    }
    None
}

/// Renders a detail page and runs a selector ladder over it
///
/// The shared body of every adapter's `resolve_target`: render, parse, try
/// the rules in order. `None` on render failure or when no rule matches.
pub(crate) async fn resolve_with_ladder(
    renderer: &dyn PageRenderer,
    detail_link: &Url,
    rules: &[&str],
    needle: &str,
) -> Option<Url> {
    let body = renderer.render(detail_link).await?;
    let doc = Html::parse_document(&body);
    first_matching_link(&doc, rules, needle, detail_link)
}

/// Walks listing pages 1..=`pages`, rendering each and extracting items
///
/// A page that fails to render is logged and skipped; extraction continues
/// with the remaining pages. Items without a title or detail link never make
/// it out of the per-page extractors, so the concatenation is already clean.
pub(crate) async fn walk_listing<U, E>(
    renderer: &dyn PageRenderer,
    source: Source,
    pages: u32,
    page_url: U,
    extract: E,
) -> Vec<CandidateItem>
where
    U: Fn(u32) -> Option<Url> + Send + Sync,
    E: Fn(&Html) -> Vec<CandidateItem> + Send + Sync,
{
    let mut all = Vec::new();

    for page in 1..=pages {
        let Some(url) = page_url(page) else {
            tracing::warn!("[{}] Could not build URL for page {}", source, page);
            continue;
        };

        let Some(body) = renderer.render(&url).await else {
            tracing::warn!("[{}] Page {} failed to render, skipping", source, page);
            continue;
        };

        // Parse and extract inside a block so the non-Send document is
        // dropped before the next await
        let items = {
            let doc = Html::parse_document(&body);
            extract(&doc)
        };

        tracing::info!("[{}] Page {}: {} items", source, page, items.len());
        all.extend(items);
    }

    all
}
