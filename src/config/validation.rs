use crate::config::types::{ClassifierConfig, Config, ExpiryConfig, ScrapeConfig, SiteEntry};
use crate::sources::Source;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scrape_config(&config.scrape)?;
    validate_classifier_config(&config.classifier)?;
    validate_expiry_config(&config.expiry)?;
    validate_output_config(&config.output)?;
    validate_sites(&config.sites)?;
    Ok(())
}

/// Validates scrape orchestration configuration
fn validate_scrape_config(config: &ScrapeConfig) -> Result<(), ConfigError> {
    if config.candidate_delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "candidate_delay_ms must be <= 60000ms, got {}ms",
            config.candidate_delay_ms
        )));
    }

    Ok(())
}

/// Validates classifier configuration
fn validate_classifier_config(config: &ClassifierConfig) -> Result<(), ConfigError> {
    Url::parse(&config.api_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid classifier api_url: {}", e)))?;

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "classifier timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates expiry checker configuration
fn validate_expiry_config(config: &ExpiryConfig) -> Result<(), ConfigError> {
    if config.max_age_days < 0 {
        return Err(ConfigError::Validation(format!(
            "max_age_days must be >= 0, got {}",
            config.max_age_days
        )));
    }

    if config.batch_size < 1 || config.batch_size > 50 {
        return Err(ConfigError::Validation(format!(
            "batch_size must be between 1 and 50, got {}",
            config.batch_size
        )));
    }

    if config.check_limit < 1 {
        return Err(ConfigError::Validation(
            "check_limit must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &crate::config::types::OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates per-source site entries
///
/// Every entry must name a registered adapter, source tags must be unique,
/// and page counts must be reasonable.
fn validate_sites(sites: &[SiteEntry]) -> Result<(), ConfigError> {
    if sites.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[site]] entry is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();

    for entry in sites {
        if Source::from_tag(&entry.source).is_none() {
            return Err(ConfigError::Validation(format!(
                "unknown source '{}' (known: {})",
                entry.source,
                Source::ALL
                    .iter()
                    .map(|s| s.tag())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        if !seen.insert(entry.source.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate [[site]] entry for source '{}'",
                entry.source
            )));
        }

        if entry.pages < 1 || entry.pages > 50 {
            return Err(ConfigError::Validation(format!(
                "pages for '{}' must be between 1 and 50, got {}",
                entry.source, entry.pages
            )));
        }

        if entry.source_label.is_empty() {
            return Err(ConfigError::Validation(format!(
                "source_label for '{}' cannot be empty",
                entry.source
            )));
        }
    }

    Ok(())
}
