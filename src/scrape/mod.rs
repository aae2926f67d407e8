//! Scrape orchestration
//!
//! Drives one full harvest cycle: for each enabled site, list candidates
//! from its paginated listings, dedup against the store, resolve survivors
//! to their outbound course link, classify, and insert. Sources are
//! processed in config order and isolated from each other; one site having
//! a bad day never stops the rest.

use crate::classify::Classifier;
use crate::config::{Config, SiteEntry};
use crate::render::PageRenderer;
use crate::slug::slugify;
use crate::sources::{adapter_for, repair_image_url, SiteAdapter, Source};
use crate::storage::{CourseStore, NewCourse};
use crate::Result;
use std::time::Duration;

/// Counters for one source in one cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStats {
    pub source: Source,
    /// Candidates found on listing pages
    pub discovered: u64,
    /// New rows written
    pub saved: u64,
    /// Candidates dropped by dedup, failed resolution, or insert conflict
    pub skipped: u64,
}

/// Report for a full scrape cycle
#[derive(Debug, Default)]
pub struct ScrapeReport {
    pub sources: Vec<SourceStats>,
}

impl ScrapeReport {
    pub fn total_discovered(&self) -> u64 {
        self.sources.iter().map(|s| s.discovered).sum()
    }

    pub fn total_saved(&self) -> u64 {
        self.sources.iter().map(|s| s.saved).sum()
    }

    pub fn total_skipped(&self) -> u64 {
        self.sources.iter().map(|s| s.skipped).sum()
    }
}

/// Runs one scrape cycle over every enabled site in config order
///
/// The run is recorded in the store with the config hash for provenance.
pub async fn run_scrape_cycle<S: CourseStore>(
    config: &Config,
    config_hash: &str,
    store: &mut S,
    renderer: &dyn PageRenderer,
    classifier: &Classifier,
) -> Result<ScrapeReport> {
    let run_id = store.create_run(config_hash)?;
    let mut report = ScrapeReport::default();

    for site in &config.sites {
        if !site.enabled {
            tracing::info!("[{}] Disabled, skipping", site.source);
            continue;
        }
        let Some(source) = Source::from_tag(&site.source) else {
            // Validation catches this at load time; a stale config is logged
            // and skipped rather than aborting the cycle
            tracing::warn!("[{}] No adapter registered, skipping", site.source);
            continue;
        };

        let adapter = adapter_for(source);
        let result = scrape_source(
            store,
            renderer,
            classifier,
            adapter.as_ref(),
            site,
            Duration::from_millis(config.scrape.candidate_delay_ms),
        )
        .await;

        match result {
            Ok(stats) => {
                tracing::info!(
                    "[{}] Done: {} discovered, {} saved, {} skipped",
                    stats.source,
                    stats.discovered,
                    stats.saved,
                    stats.skipped
                );
                report.sources.push(stats);
            }
            Err(e) => {
                tracing::error!("[{}] Source failed: {}", source, e);
            }
        }
    }

    store.complete_run(run_id)?;
    tracing::info!(
        "Cycle complete: {} discovered, {} saved, {} skipped",
        report.total_discovered(),
        report.total_saved(),
        report.total_skipped()
    );

    Ok(report)
}

/// Scrapes a single source: list, dedup, resolve, classify, insert
///
/// Dedup runs before resolution so a known course costs one query instead
/// of a detail-page render. The insert itself is conflict-safe, so a
/// target-link collision discovered only after resolution also counts as
/// skipped.
pub(crate) async fn scrape_source<S: CourseStore>(
    store: &mut S,
    renderer: &dyn PageRenderer,
    classifier: &Classifier,
    adapter: &dyn SiteAdapter,
    site: &SiteEntry,
    delay: Duration,
) -> Result<SourceStats> {
    let source = adapter.source();
    let candidates = adapter.list_candidates(renderer, site.pages).await;

    let mut stats = SourceStats {
        source,
        discovered: candidates.len() as u64,
        saved: 0,
        skipped: 0,
    };

    for candidate in candidates {
        let slug = slugify(&candidate.title);
        if slug.is_empty() {
            stats.skipped += 1;
            continue;
        }

        if store.find_by_slug_or_title(&slug, &candidate.title)?.is_some() {
            tracing::debug!("[{}] Already stored: {}", source, slug);
            stats.skipped += 1;
            continue;
        }

        let Some(target_link) = adapter.resolve_target(renderer, &candidate.detail_link).await
        else {
            tracing::debug!("[{}] No outbound link for {}", source, slug);
            stats.skipped += 1;
            continue;
        };

        let category = classifier
            .classify(&candidate.title, Some(&site.source_label))
            .await;

        let course = NewCourse {
            title: candidate.title,
            slug,
            image: repair_image_url(candidate.image.as_ref()).to_string(),
            target_link: target_link.to_string(),
            category,
            source: source.tag().to_string(),
        };

        if store.insert_if_absent(&course)? {
            tracing::info!("[{}] Saved {}", source, course.slug);
            stats.saved += 1;
        } else {
            tracing::debug!("[{}] Conflict on insert: {}", source, course.slug);
            stats.skipped += 1;
        }

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::CandidateItem;
    use crate::storage::{CourseRecord, RunRecord, SqliteStore, StoreError, StoreResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use url::Url;

    struct NullRenderer;

    #[async_trait]
    impl PageRenderer for NullRenderer {
        async fn render(&self, _url: &Url) -> Option<String> {
            None
        }
    }

    /// Serves canned candidates and counts resolution calls
    struct StubAdapter {
        candidates: Vec<CandidateItem>,
        resolves: AtomicUsize,
        resolvable: bool,
    }

    impl StubAdapter {
        fn new(titles: &[&str], resolvable: bool) -> Self {
            let candidates = titles
                .iter()
                .map(|title| CandidateItem {
                    title: title.to_string(),
                    detail_link: Url::parse(&format!(
                        "https://couponscorpion.com/{}/",
                        slugify(title)
                    ))
                    .unwrap(),
                    image: None,
                    source: Source::CouponScorpion,
                })
                .collect();
            Self {
                candidates,
                resolves: AtomicUsize::new(0),
                resolvable,
            }
        }
    }

    #[async_trait]
    impl SiteAdapter for StubAdapter {
        fn source(&self) -> Source {
            Source::CouponScorpion
        }

        async fn list_candidates(
            &self,
            _renderer: &dyn PageRenderer,
            _pages: u32,
        ) -> Vec<CandidateItem> {
            self.candidates.clone()
        }

        async fn resolve_target(
            &self,
            _renderer: &dyn PageRenderer,
            detail_link: &Url,
        ) -> Option<Url> {
            self.resolves.fetch_add(1, Ordering::SeqCst);
            if self.resolvable {
                let slug = detail_link.path().trim_matches('/').to_string();
                Url::parse(&format!(
                    "https://www.udemy.com/course/{}/?couponCode=FREE",
                    slug
                ))
                .ok()
            } else {
                None
            }
        }
    }

    fn site() -> SiteEntry {
        SiteEntry {
            source: "couponscorpion".to_string(),
            enabled: true,
            pages: 1,
            source_label: "Scorpion Global".to_string(),
        }
    }

    #[tokio::test]
    async fn test_scrape_source_saves_new_courses() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        let adapter = StubAdapter::new(&["Python Bootcamp", "Excel Mastery"], true);

        let stats = scrape_source(
            &mut store,
            &NullRenderer,
            &Classifier::rules_only(),
            &adapter,
            &site(),
            Duration::ZERO,
        )
        .await
        .unwrap();

        assert_eq!(stats.discovered, 2);
        assert_eq!(stats.saved, 2);
        assert_eq!(stats.skipped, 0);

        let saved = store
            .find_by_slug_or_title("python-bootcamp", "")
            .unwrap()
            .unwrap();
        assert_eq!(saved.category, "Programming");
        assert_eq!(saved.source, "couponscorpion");
        assert!(saved.target_link.contains("couponCode"));
    }

    #[tokio::test]
    async fn test_known_course_skips_resolution() {
        let mut store = SqliteStore::new_in_memory().unwrap();

        let first = StubAdapter::new(&["Python Bootcamp"], true);
        scrape_source(
            &mut store,
            &NullRenderer,
            &Classifier::rules_only(),
            &first,
            &site(),
            Duration::ZERO,
        )
        .await
        .unwrap();

        // Second pass over the same listing never touches the detail page
        let second = StubAdapter::new(&["Python Bootcamp"], true);
        let stats = scrape_source(
            &mut store,
            &NullRenderer,
            &Classifier::rules_only(),
            &second,
            &site(),
            Duration::ZERO,
        )
        .await
        .unwrap();

        assert_eq!(stats.saved, 0);
        assert_eq!(stats.skipped, 1);
        assert_eq!(second.resolves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unresolvable_candidate_is_skipped() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        let adapter = StubAdapter::new(&["Mystery Course"], false);

        let stats = scrape_source(
            &mut store,
            &NullRenderer,
            &Classifier::rules_only(),
            &adapter,
            &site(),
            Duration::ZERO,
        )
        .await
        .unwrap();

        assert_eq!(stats.saved, 0);
        assert_eq!(stats.skipped, 1);
        assert_eq!(store.count_total().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_placeholder_label_not_inherited() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        // Title the rules cannot place; the site label is a placeholder
        let adapter = StubAdapter::new(&["Mystery Course"], true);

        scrape_source(
            &mut store,
            &NullRenderer,
            &Classifier::rules_only(),
            &adapter,
            &site(),
            Duration::ZERO,
        )
        .await
        .unwrap();

        let saved = store
            .find_by_slug_or_title("mystery-course", "")
            .unwrap()
            .unwrap();
        assert_eq!(saved.category, "Other Courses");
    }

    fn cycle_config(sites: Vec<SiteEntry>) -> Config {
        Config {
            scrape: crate::config::ScrapeConfig {
                candidate_delay_ms: 0,
            },
            renderer: Default::default(),
            classifier: Default::default(),
            expiry: crate::config::ExpiryConfig {
                max_age_days: 3,
                batch_size: 5,
                probe_timeout_secs: 5,
                check_limit: 100,
            },
            output: crate::config::OutputConfig {
                database_path: ":memory:".to_string(),
            },
            sites,
        }
    }

    #[tokio::test]
    async fn test_cycle_skips_disabled_and_unknown_sites() {
        let config = cycle_config(vec![
            SiteEntry {
                enabled: false,
                ..site()
            },
            SiteEntry {
                source: "defunct-site".to_string(),
                enabled: true,
                pages: 1,
                source_label: "Defunct".to_string(),
            },
        ]);

        let mut store = SqliteStore::new_in_memory().unwrap();
        let report = run_scrape_cycle(
            &config,
            "abc123",
            &mut store,
            &NullRenderer,
            &Classifier::rules_only(),
        )
        .await
        .unwrap();

        // Neither site ran, but the cycle itself completed and was recorded
        assert!(report.sources.is_empty());
        let run = store.latest_run().unwrap().unwrap();
        assert_eq!(run.config_hash, "abc123");
        assert!(run.finished_at.is_some());
    }

    /// Delegates to a real store but errors on one slug's dedup lookup
    struct FailStore {
        inner: SqliteStore,
        poison_slug: &'static str,
    }

    impl FailStore {
        fn outage() -> StoreError {
            StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "database connection lost",
            ))
        }
    }

    impl CourseStore for FailStore {
        fn create_run(&mut self, config_hash: &str) -> StoreResult<i64> {
            self.inner.create_run(config_hash)
        }

        fn complete_run(&mut self, run_id: i64) -> StoreResult<()> {
            self.inner.complete_run(run_id)
        }

        fn latest_run(&self) -> StoreResult<Option<RunRecord>> {
            self.inner.latest_run()
        }

        fn find_by_slug_or_title(
            &self,
            slug: &str,
            title: &str,
        ) -> StoreResult<Option<CourseRecord>> {
            if slug == self.poison_slug {
                return Err(Self::outage());
            }
            self.inner.find_by_slug_or_title(slug, title)
        }

        fn insert_if_absent(&mut self, course: &NewCourse) -> StoreResult<bool> {
            self.inner.insert_if_absent(course)
        }

        fn get_course(&self, id: i64) -> StoreResult<CourseRecord> {
            self.inner.get_course(id)
        }

        fn query_stale(&self, cutoff: &str, limit: u32) -> StoreResult<Vec<CourseRecord>> {
            self.inner.query_stale(cutoff, limit)
        }

        fn mark_expired(&mut self, id: i64) -> StoreResult<bool> {
            self.inner.mark_expired(id)
        }

        fn update_category(&mut self, id: i64, category: &str) -> StoreResult<()> {
            self.inner.update_category(id, category)
        }

        fn all_courses(&self) -> StoreResult<Vec<CourseRecord>> {
            self.inner.all_courses()
        }

        fn count_total(&self) -> StoreResult<u64> {
            self.inner.count_total()
        }

        fn count_expired(&self) -> StoreResult<u64> {
            self.inner.count_expired()
        }

        fn count_by_source(&self) -> StoreResult<Vec<(String, u64)>> {
            self.inner.count_by_source()
        }

        fn count_by_category(&self) -> StoreResult<Vec<(String, u64)>> {
            self.inner.count_by_category()
        }
    }

    /// Serves fixed pages keyed by host so real adapters can run offline
    struct CannedRenderer;

    const SCORPION_LISTING: &str = r#"
        <html><body>
        <article>
            <h3>Broken Course</h3>
            <a href="/broken-course/"></a>
        </article>
        </body></html>
    "#;

    const ONLINECOURSES_PAGE: &str = r#"
        <html><body>
        <article class="col_item">
            <h2><a href="/course/docker-deep-dive/">Docker Deep Dive</a></h2>
        </article>
        <a href="https://www.udemy.com/course/docker-deep-dive/?couponCode=OK">Enroll</a>
        </body></html>
    "#;

    #[async_trait]
    impl PageRenderer for CannedRenderer {
        async fn render(&self, url: &Url) -> Option<String> {
            match url.host_str() {
                Some("couponscorpion.com") => Some(SCORPION_LISTING.to_string()),
                Some("www.onlinecourses.ooo") => Some(ONLINECOURSES_PAGE.to_string()),
                _ => None,
            }
        }
    }

    #[tokio::test]
    async fn test_failing_source_does_not_stop_the_cycle() {
        let mut store = FailStore {
            inner: SqliteStore::new_in_memory().unwrap(),
            poison_slug: "broken-course",
        };
        let config = cycle_config(vec![
            site(),
            SiteEntry {
                source: "onlinecourses".to_string(),
                enabled: true,
                pages: 1,
                source_label: "OnlineCourses".to_string(),
            },
        ]);

        let report = run_scrape_cycle(
            &config,
            "abc123",
            &mut store,
            &CannedRenderer,
            &Classifier::rules_only(),
        )
        .await
        .unwrap();

        // The first source dies on its dedup lookup; the second still runs
        // to completion and its counts land in the report
        assert_eq!(report.sources.len(), 1);
        assert_eq!(report.sources[0].source, Source::OnlineCourses);
        assert_eq!(report.sources[0].saved, 1);
        assert!(store
            .inner
            .find_by_slug_or_title("docker-deep-dive", "")
            .unwrap()
            .is_some());
        assert!(store.inner.latest_run().unwrap().unwrap().finished_at.is_some());
    }

    #[tokio::test]
    async fn test_missing_image_gets_placeholder() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        let adapter = StubAdapter::new(&["Python Bootcamp"], true);

        scrape_source(
            &mut store,
            &NullRenderer,
            &Classifier::rules_only(),
            &adapter,
            &site(),
            Duration::ZERO,
        )
        .await
        .unwrap();

        let saved = store
            .find_by_slug_or_title("python-bootcamp", "")
            .unwrap()
            .unwrap();
        assert!(saved.image.contains("placeholder"));
    }
}
