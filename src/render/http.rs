//! HTTP-backed page renderer
//!
//! Fetches pages with reqwest and applies the two-tier wait strategy the
//! listing sites need: a "network settled" attempt with a long timeout, and
//! on any transport-level failure a "DOM ready" fallback with a shorter
//! timeout followed by a fixed settle delay. Sites vary widely in how long
//! their client side takes to produce markup, so a single fixed wait either
//! stalls fast sites or truncates slow ones.

use crate::config::RendererConfig;
use crate::render::{PageRenderer, BROWSER_USER_AGENT};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Page renderer backed by a plain HTTP client
pub struct HttpRenderer {
    client: Client,
    network_settled: Duration,
    dom_ready: Duration,
    settle_delay: Duration,
}

impl HttpRenderer {
    /// Builds a renderer from the configured wait profile
    pub fn new(config: &RendererConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            network_settled: Duration::from_secs(config.network_settled_timeout_secs),
            dom_ready: Duration::from_secs(config.dom_ready_timeout_secs),
            settle_delay: Duration::from_secs(config.settle_delay_secs),
        })
    }

    async fn fetch_with_timeout(&self, url: &Url, timeout: Duration) -> Result<String, reqwest::Error> {
        let response = self
            .client
            .get(url.as_str())
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;

        response.text().await
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &Url) -> Option<String> {
        // Tier one: wait for the site to settle, generous timeout.
        match self.fetch_with_timeout(url, self.network_settled).await {
            Ok(body) => Some(body),
            // Timeouts, resets, truncated bodies all get a second chance;
            // only an error status from the server is terminal.
            Err(first) if !first.is_status() => {
                // Tier two: shorter attempt, then a fixed settle delay.
                tracing::debug!("Settled fetch of {} failed ({}), retrying with short wait", url, first);
                match self.fetch_with_timeout(url, self.dom_ready).await {
                    Ok(body) => {
                        tokio::time::sleep(self.settle_delay).await;
                        Some(body)
                    }
                    Err(e) => {
                        tracing::warn!("Failed to render {}: {}", url, e);
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Failed to render {}: {}", url, e);
                None
            }
        }
    }
}
