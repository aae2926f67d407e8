use serde::Deserialize;

/// Main configuration structure for Coursepress
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub scrape: ScrapeConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    pub expiry: ExpiryConfig,
    pub output: OutputConfig,
    /// Per-source site entries, processed in the order they appear
    #[serde(default, rename = "site")]
    pub sites: Vec<SiteEntry>,
}

/// Scrape orchestration configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    /// Pause between successive candidate-level writes (milliseconds)
    #[serde(rename = "candidate-delay-ms")]
    pub candidate_delay_ms: u64,
}

/// Page renderer wait configuration
///
/// Every render applies a two-tier wait: a long "network settled" attempt,
/// then a shorter "DOM ready" fallback followed by a fixed settle delay.
#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    /// Timeout for the "network settled" attempt (seconds)
    #[serde(rename = "network-settled-timeout-secs", default = "default_network_settled")]
    pub network_settled_timeout_secs: u64,

    /// Timeout for the "DOM ready" fallback attempt (seconds)
    #[serde(rename = "dom-ready-timeout-secs", default = "default_dom_ready")]
    pub dom_ready_timeout_secs: u64,

    /// Fixed settle delay after the fallback attempt (seconds)
    #[serde(rename = "settle-delay-secs", default = "default_settle_delay")]
    pub settle_delay_secs: u64,
}

fn default_network_settled() -> u64 {
    90
}

fn default_dom_ready() -> u64 {
    30
}

fn default_settle_delay() -> u64 {
    2
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            network_settled_timeout_secs: default_network_settled(),
            dom_ready_timeout_secs: default_dom_ready(),
            settle_delay_secs: default_settle_delay(),
        }
    }
}

/// Category classifier configuration
///
/// The remote classifier is opt-in and additionally requires the
/// `ANTHROPIC_API_KEY` environment variable; without both it is silently
/// disabled and classification falls through to the inherited label.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Enable the remote text-classification fallback
    #[serde(rename = "use-remote", default)]
    pub use_remote: bool,

    /// Endpoint for the remote classifier
    #[serde(rename = "api-url", default = "default_classifier_url")]
    pub api_url: String,

    /// Model identifier sent with each request
    #[serde(default = "default_classifier_model")]
    pub model: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_classifier_timeout")]
    pub timeout_secs: u64,
}

fn default_classifier_url() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_classifier_model() -> String {
    "claude-haiku-4-5".to_string()
}

fn default_classifier_timeout() -> u64 {
    10
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            use_remote: false,
            api_url: default_classifier_url(),
            model: default_classifier_model(),
            timeout_secs: default_classifier_timeout(),
        }
    }
}

/// Link-liveness checker configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExpiryConfig {
    /// Only check records older than this many days
    #[serde(rename = "max-age-days")]
    pub max_age_days: i64,

    /// Number of records probed concurrently per batch
    #[serde(rename = "batch-size")]
    pub batch_size: usize,

    /// Per-probe timeout (seconds)
    #[serde(rename = "probe-timeout-secs", default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Maximum records examined per run
    #[serde(rename = "check-limit", default = "default_check_limit")]
    pub check_limit: u32,
}

fn default_probe_timeout() -> u64 {
    10
}

fn default_check_limit() -> u32 {
    500
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// Per-source site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteEntry {
    /// Source tag, e.g. "couponscorpion" (must match a registered adapter)
    pub source: String,

    /// Whether this source is scraped at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Number of listing pages to walk per run
    pub pages: u32,

    /// The site's own generic bucket label, used as the inherited category
    #[serde(rename = "source-label")]
    pub source_label: String,
}

fn default_enabled() -> bool {
    true
}
