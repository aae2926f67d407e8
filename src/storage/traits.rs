//! Storage traits and error types

use crate::storage::{CourseRecord, NewCourse, RunRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Course not found: {0}")]
    CourseNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for course storage backends
///
/// Defines all database operations the pipeline needs. The dedup contract
/// lives here: a course is the same course when its slug or target link
/// collides with a stored one, and `insert_if_absent` never overwrites.
pub trait CourseStore {
    // ===== Run Management =====

    /// Records the start of a scrape run, returning its ID
    fn create_run(&mut self, config_hash: &str) -> StoreResult<i64>;

    /// Marks a run as finished with a timestamp
    fn complete_run(&mut self, run_id: i64) -> StoreResult<()>;

    /// Gets the most recent run, if any
    fn latest_run(&self) -> StoreResult<Option<RunRecord>>;

    // ===== Course Management =====

    /// Finds a stored course whose slug matches, or whose title matches
    /// exactly
    ///
    /// This is the pre-resolve dedup check: it runs before the expensive
    /// detail-page resolution, so a known course costs one query instead of
    /// a page render.
    fn find_by_slug_or_title(&self, slug: &str, title: &str) -> StoreResult<Option<CourseRecord>>;

    /// Inserts a course unless its slug or target link already exists
    ///
    /// Returns `true` when a row was inserted, `false` when an existing row
    /// won the conflict. Existing rows are never modified.
    fn insert_if_absent(&mut self, course: &NewCourse) -> StoreResult<bool>;

    /// Gets a course by ID
    fn get_course(&self, id: i64) -> StoreResult<CourseRecord>;

    /// Returns non-expired courses added strictly before `cutoff`, oldest
    /// first, at most `limit` rows
    fn query_stale(&self, cutoff: &str, limit: u32) -> StoreResult<Vec<CourseRecord>>;

    /// Marks a course expired with a timestamp
    ///
    /// Expiry is monotonic: a row already marked expired is left untouched,
    /// keeping its original `expired_at`. Returns `true` when this call did
    /// the marking.
    fn mark_expired(&mut self, id: i64) -> StoreResult<bool>;

    /// Replaces the category of a course
    fn update_category(&mut self, id: i64, category: &str) -> StoreResult<()>;

    /// Returns all stored courses, newest first
    fn all_courses(&self) -> StoreResult<Vec<CourseRecord>>;

    // ===== Statistics =====

    /// Total number of stored courses
    fn count_total(&self) -> StoreResult<u64>;

    /// Number of courses marked expired
    fn count_expired(&self) -> StoreResult<u64>;

    /// Course counts per source tag, largest first
    fn count_by_source(&self) -> StoreResult<Vec<(String, u64)>>;

    /// Course counts per category, largest first
    fn count_by_category(&self) -> StoreResult<Vec<(String, u64)>>;
}
