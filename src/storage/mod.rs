//! Storage module for persisting harvested courses
//!
//! This module handles all database operations for the pipeline, including:
//! - SQLite database initialization and schema management
//! - Conflict-safe course insertion and dedup lookups
//! - Expiry marking and stale-course queries
//! - Run tracking with config provenance

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{CourseStore, StoreError, StoreResult};

use crate::CoursepressError;
use std::path::Path;

/// Initializes or opens a course database
pub fn open_store(path: &Path) -> Result<SqliteStore, CoursepressError> {
    SqliteStore::new(path)
}

/// A course as stored in the database
#[derive(Debug, Clone)]
pub struct CourseRecord {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub image: String,
    pub target_link: String,
    pub category: String,
    pub source: String,
    pub is_free: bool,
    pub added_at: String,
    pub expired: bool,
    pub expired_at: Option<String>,
}

/// A course ready for insertion
///
/// `added_at`, `is_free` and the expiry columns are filled in by the store.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub slug: String,
    pub image: String,
    pub target_link: String,
    pub category: String,
    pub source: String,
}

/// A recorded scrape run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
}
