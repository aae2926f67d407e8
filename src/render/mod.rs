//! Page rendering capability
//!
//! The scrape pipeline treats "turn a URL into rendered HTML" as an opaque
//! capability behind the [`PageRenderer`] trait. The default backend is a
//! plain HTTP fetcher; a headless-browser backend can implement the same
//! trait without touching the adapters.

mod http;

pub use http::HttpRenderer;

use async_trait::async_trait;
use url::Url;

/// Browser-like User-Agent; several listing sites serve bot-detected
/// requests an empty shell, and the liveness probe gets the same treatment.
pub(crate) const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Capability for rendering a page into HTML
///
/// Rendering is best-effort: a failed render returns `None` and is logged by
/// the implementation. Callers treat `None` as "no data", never as a fatal
/// condition.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Renders `url` and returns the page HTML, or `None` on failure
    async fn render(&self, url: &Url) -> Option<String>;
}
