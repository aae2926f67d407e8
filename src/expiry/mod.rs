//! Coupon liveness checking
//!
//! Periodically probes stored course links old enough to be suspect and
//! retires the dead ones. A link is dead when the course page is gone
//! (404/410/403) or when the platform has silently stripped the coupon
//! code off the final URL. Transport failures prove nothing about the
//! coupon, so those records are left untouched for the next sweep.

use crate::config::ExpiryConfig;
use crate::storage::{CourseRecord, CourseStore};
use crate::Result;
use chrono::{Duration as ChronoDuration, SecondsFormat, Utc};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Pause between probe batches
const BATCH_PAUSE: Duration = Duration::from_millis(500);

/// Outcome of probing a single link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Liveness {
    Live,
    Dead,
}

/// Counters for one expiry sweep
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ExpiryReport {
    /// Records probed
    pub checked: u64,
    /// Records newly marked expired
    pub expired: u64,
    /// Records confirmed live
    pub live: u64,
    /// Probes that failed at the transport level
    pub errors: u64,
}

/// Statuses that mean the offer itself is gone, as opposed to the server
/// having a bad moment
fn status_is_dead(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::NOT_FOUND | StatusCode::GONE | StatusCode::FORBIDDEN
    )
}

/// Detects the platform's coupon-stripping redirect: landing on a bare
/// course URL means the coupon no longer applies
fn is_stripped_coupon(final_url: &str) -> bool {
    final_url.contains("udemy.com/course") && !final_url.contains("couponCode")
}

async fn probe(client: &Client, url: &str, timeout: Duration) -> reqwest::Result<Liveness> {
    let response = client.head(url).timeout(timeout).send().await?;

    if status_is_dead(response.status()) {
        return Ok(Liveness::Dead);
    }
    if is_stripped_coupon(response.url().as_str()) {
        return Ok(Liveness::Dead);
    }
    Ok(Liveness::Live)
}

/// Runs one expiry sweep over stale records
///
/// Stale means non-expired and older than the configured age. Records are
/// probed in fixed-size concurrent batches, oldest first, up to the
/// per-run limit.
pub async fn run_expiry<S: CourseStore>(
    config: &ExpiryConfig,
    store: &mut S,
) -> Result<ExpiryReport> {
    let cutoff = (Utc::now() - ChronoDuration::days(config.max_age_days))
        .to_rfc3339_opts(SecondsFormat::Secs, true);
    let stale = store.query_stale(&cutoff, config.check_limit)?;

    tracing::info!("Expiry sweep: {} records older than {}", stale.len(), cutoff);

    let client = Client::builder()
        .user_agent(crate::render::BROWSER_USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .connect_timeout(Duration::from_secs(10))
        .build()?;
    let timeout = Duration::from_secs(config.probe_timeout_secs);

    let mut report = ExpiryReport::default();

    for batch in stale.chunks(config.batch_size.max(1)) {
        let mut handles = Vec::with_capacity(batch.len());
        for course in batch {
            let client = client.clone();
            let course: CourseRecord = course.clone();
            handles.push(tokio::spawn(async move {
                let outcome = probe(&client, &course.target_link, timeout).await;
                (course, outcome)
            }));
        }

        for handle in handles {
            // Every batch member counts as checked, so
            // checked == expired + live + errors
            report.checked += 1;
            let Ok((course, outcome)) = handle.await else {
                report.errors += 1;
                continue;
            };

            match outcome {
                Ok(Liveness::Dead) => {
                    if store.mark_expired(course.id)? {
                        tracing::info!("Expired: {}", course.slug);
                        report.expired += 1;
                    }
                }
                Ok(Liveness::Live) => {
                    report.live += 1;
                }
                Err(e) => {
                    tracing::debug!("Probe failed for {}: {}", course.slug, e);
                    report.errors += 1;
                }
            }
        }

        tokio::time::sleep(BATCH_PAUSE).await;
    }

    tracing::info!(
        "Expiry sweep done: {} checked, {} expired, {} live, {} errors",
        report.checked,
        report.expired,
        report.live,
        report.errors
    );
    Ok(report)
}
