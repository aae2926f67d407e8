//! Coursepress: a multi-source course-coupon harvester
//!
//! This crate implements a scrape-and-reconcile pipeline that harvests free
//! course coupons from several listing sites, classifies them by topic,
//! deduplicates them against a local store, and periodically re-checks stored
//! coupons so stale ones can be retired.

pub mod classify;
pub mod config;
pub mod expiry;
pub mod render;
pub mod scrape;
pub mod slug;
pub mod sources;
pub mod stats;
pub mod storage;

use thiserror::Error;

/// Main error type for Coursepress operations
#[derive(Debug, Error)]
pub enum CoursepressError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Store error: {0}")]
    Store(#[from] storage::StoreError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Coursepress operations
pub type Result<T> = std::result::Result<T, CoursepressError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use sources::{CandidateItem, Source};
pub use storage::{CourseRecord, CourseStore, SqliteStore};
