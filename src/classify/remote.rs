//! Remote classification tier
//!
//! Asks a hosted language model to pick a category for titles the keyword
//! rules could not place. Strictly best-effort: missing API key, transport
//! errors, non-200 responses and out-of-vocabulary replies all degrade to
//! `None` and the caller falls through to the next tier.

use crate::classify::keywords::{is_known_category, CATEGORY_KEYWORDS, DEFAULT_CATEGORY};
use crate::config::ClassifierConfig;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Client for the remote classification API
pub struct RemoteClassifier {
    http: Client,
    api_url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl RemoteClassifier {
    /// Builds a classifier with an explicit API key (used by tests)
    pub fn new(config: &ClassifierConfig, api_key: Option<String>) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(4))
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            api_key,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Builds a classifier with the API key from the environment
    pub fn from_env(config: &ClassifierConfig) -> Result<Self, reqwest::Error> {
        let api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        Self::new(config, api_key)
    }

    fn prompt(title: &str) -> String {
        let categories: Vec<&str> = CATEGORY_KEYWORDS
            .iter()
            .map(|(cat, _)| *cat)
            .chain(std::iter::once(DEFAULT_CATEGORY))
            .collect();

        format!(
            "Classify this Udemy course title into exactly one category.\n\
             Title: {}\n\
             Categories: {}\n\
             Reply with ONLY the category name, nothing else.",
            title,
            categories.join(", ")
        )
    }

    /// Asks the remote model to classify a title
    ///
    /// Returns a category from the known set, or `None` on any failure.
    pub async fn classify(&self, title: &str) -> Option<String> {
        let api_key = self.api_key.as_deref()?;

        let body = json!({
            "model": self.model,
            "max_tokens": 20,
            "messages": [{
                "role": "user",
                "content": Self::prompt(title),
            }],
        });

        let response = self
            .http
            .post(&self.api_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await;

        let response = match response {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::debug!("Remote classifier returned status {}", r.status());
                return None;
            }
            Err(e) => {
                tracing::debug!("Remote classifier request failed: {}", e);
                return None;
            }
        };

        let payload: Value = response.json().await.ok()?;
        let category = payload
            .get("content")?
            .get(0)?
            .get("text")?
            .as_str()?
            .trim()
            .to_string();

        if is_known_category(&category) {
            Some(category)
        } else {
            tracing::debug!("Remote classifier replied outside the category set: {}", category);
            None
        }
    }
}
