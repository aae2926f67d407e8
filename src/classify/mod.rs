//! Course category classification
//!
//! Classification is tiered, cheapest first:
//!
//! 1. Keyword rules over the title (no network)
//! 2. Optional remote model call, when enabled and a key is available
//! 3. The category inherited from the listing site, unless it is one of the
//!    sites' placeholder labels
//! 4. The default bucket
//!
//! Every tier is best-effort; the default bucket is always reachable.

mod keywords;
mod remote;

pub use keywords::{classify_by_rule, is_known_category, CATEGORY_KEYWORDS, DEFAULT_CATEGORY};
pub use remote::RemoteClassifier;

use crate::config::ClassifierConfig;
use crate::storage::CourseStore;
use crate::CoursepressError;

/// Site-branding labels that sometimes arrive in the category field;
/// inheriting them would store marketing copy as a topic.
const PLACEHOLDER_LABELS: &[&str] = &[
    "Scorpion Global",
    "Real Discount",
    "OnlineCourses",
    "Coursevania",
];

/// Tiered title classifier
pub struct Classifier {
    remote: Option<RemoteClassifier>,
}

impl Classifier {
    /// Builds a classifier from config; the remote tier is only active when
    /// enabled there and an API key is present in the environment.
    pub fn new(config: &ClassifierConfig) -> Result<Self, reqwest::Error> {
        let remote = if config.use_remote {
            Some(RemoteClassifier::from_env(config)?)
        } else {
            None
        };
        Ok(Self { remote })
    }

    /// Builds a classifier with no remote tier
    pub fn rules_only() -> Self {
        Self { remote: None }
    }

    /// Classifies a title, optionally considering a category inherited from
    /// the listing site
    pub async fn classify(&self, title: &str, inherited: Option<&str>) -> String {
        if let Some(category) = classify_by_rule(title) {
            return category.to_string();
        }

        if let Some(remote) = &self.remote {
            if let Some(category) = remote.classify(title).await {
                if category != DEFAULT_CATEGORY {
                    return category;
                }
            }
        }

        if let Some(inherited) = inherited {
            if !inherited.is_empty() && !PLACEHOLDER_LABELS.contains(&inherited) {
                return inherited.to_string();
            }
        }

        DEFAULT_CATEGORY.to_string()
    }
}

/// Outcome of a reclassification sweep
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReclassifyOutcome {
    pub updated: u64,
    pub skipped: u64,
}

/// Re-runs classification over every stored course
///
/// The stored category is passed back in as the inherited tier, so a course
/// the rules cannot place keeps what it has. Only changed categories are
/// written.
pub async fn reclassify_all<S: CourseStore>(
    store: &mut S,
    classifier: &Classifier,
) -> Result<ReclassifyOutcome, CoursepressError> {
    let courses = store.all_courses()?;
    let mut outcome = ReclassifyOutcome::default();

    for course in courses {
        let category = classifier
            .classify(&course.title, Some(&course.category))
            .await;

        if category != course.category {
            tracing::debug!("Reclassified {} -> {}", course.slug, category);
            store.update_category(course.id, &category)?;
            outcome.updated += 1;
        } else {
            outcome.skipped += 1;
        }
    }

    tracing::info!(
        "Reclassification done: {} updated, {} unchanged",
        outcome.updated,
        outcome.skipped
    );
    Ok(outcome)
}
