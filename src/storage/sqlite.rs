//! SQLite storage implementation

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{CourseStore, StoreError, StoreResult};
use crate::storage::{CourseRecord, NewCourse, RunRecord};
use crate::CoursepressError;
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

/// Timestamps are stored in a fixed RFC3339 shape (second precision, `Z`
/// suffix) so string comparison in SQL matches chronological order.
fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn course_from_row(row: &Row) -> rusqlite::Result<CourseRecord> {
    Ok(CourseRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        image: row.get(3)?,
        target_link: row.get(4)?,
        category: row.get(5)?,
        source: row.get(6)?,
        is_free: row.get::<_, i64>(7)? != 0,
        added_at: row.get(8)?,
        expired: row.get::<_, i64>(9)? != 0,
        expired_at: row.get(10)?,
    })
}

const COURSE_COLUMNS: &str =
    "id, title, slug, image, target_link, category, source, is_free, added_at, expired, expired_at";

impl SqliteStore {
    /// Opens or creates a course database at the given path
    pub fn new(path: &Path) -> Result<Self, CoursepressError> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self, CoursepressError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Rewrites a course's added_at so age cutoffs can be exercised
    #[cfg(test)]
    pub(crate) fn set_added_at(&self, slug: &str, added_at: &str) -> StoreResult<()> {
        self.conn.execute(
            "UPDATE courses SET added_at = ?1 WHERE slug = ?2",
            params![added_at, slug],
        )?;
        Ok(())
    }
}

impl CourseStore for SqliteStore {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StoreResult<i64> {
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash) VALUES (?1, ?2)",
            params![now_rfc3339(), config_hash],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn complete_run(&mut self, run_id: i64) -> StoreResult<()> {
        self.conn.execute(
            "UPDATE runs SET finished_at = ?1 WHERE id = ?2",
            params![now_rfc3339(), run_id],
        )?;
        Ok(())
    }

    fn latest_run(&self) -> StoreResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash FROM runs ORDER BY id DESC LIMIT 1",
                [],
                |row| {
                    Ok(RunRecord {
                        id: row.get(0)?,
                        started_at: row.get(1)?,
                        finished_at: row.get(2)?,
                        config_hash: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(run)
    }

    // ===== Course Management =====

    fn find_by_slug_or_title(&self, slug: &str, title: &str) -> StoreResult<Option<CourseRecord>> {
        let query = format!(
            "SELECT {} FROM courses WHERE slug = ?1 OR title = ?2 LIMIT 1",
            COURSE_COLUMNS
        );
        let course = self
            .conn
            .query_row(&query, params![slug, title], course_from_row)
            .optional()?;

        Ok(course)
    }

    fn insert_if_absent(&mut self, course: &NewCourse) -> StoreResult<bool> {
        // Both unique columns (slug, target_link) are covered by the
        // bare conflict clause; an existing row always wins.
        let changed = self.conn.execute(
            "INSERT INTO courses (title, slug, image, target_link, category, source, is_free, added_at, expired)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, 0)
             ON CONFLICT DO NOTHING",
            params![
                course.title,
                course.slug,
                course.image,
                course.target_link,
                course.category,
                course.source,
                now_rfc3339(),
            ],
        )?;

        Ok(changed == 1)
    }

    fn get_course(&self, id: i64) -> StoreResult<CourseRecord> {
        let query = format!("SELECT {} FROM courses WHERE id = ?1", COURSE_COLUMNS);
        self.conn
            .query_row(&query, params![id], course_from_row)
            .map_err(|_| StoreError::CourseNotFound(id))
    }

    fn query_stale(&self, cutoff: &str, limit: u32) -> StoreResult<Vec<CourseRecord>> {
        let query = format!(
            "SELECT {} FROM courses WHERE expired = 0 AND added_at < ?1
             ORDER BY added_at ASC LIMIT ?2",
            COURSE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&query)?;
        let courses = stmt
            .query_map(params![cutoff, limit], course_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(courses)
    }

    fn mark_expired(&mut self, id: i64) -> StoreResult<bool> {
        // The expired=0 guard keeps the first expired_at timestamp
        let changed = self.conn.execute(
            "UPDATE courses SET expired = 1, expired_at = ?1 WHERE id = ?2 AND expired = 0",
            params![now_rfc3339(), id],
        )?;
        Ok(changed == 1)
    }

    fn update_category(&mut self, id: i64, category: &str) -> StoreResult<()> {
        self.conn.execute(
            "UPDATE courses SET category = ?1 WHERE id = ?2",
            params![category, id],
        )?;
        Ok(())
    }

    fn all_courses(&self) -> StoreResult<Vec<CourseRecord>> {
        let query = format!(
            "SELECT {} FROM courses ORDER BY added_at DESC, id DESC",
            COURSE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&query)?;
        let courses = stmt
            .query_map([], course_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(courses)
    }

    // ===== Statistics =====

    fn count_total(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM courses", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_expired(&self) -> StoreResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM courses WHERE expired = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_by_source(&self) -> StoreResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT source, COUNT(*) as count FROM courses GROUP BY source ORDER BY count DESC",
        )?;
        let counts = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get::<_, i64>(1)? as u64)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(counts)
    }

    fn count_by_category(&self) -> StoreResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, COUNT(*) as count FROM courses GROUP BY category ORDER BY count DESC",
        )?;
        let counts = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get::<_, i64>(1)? as u64)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(counts)
    }
}
