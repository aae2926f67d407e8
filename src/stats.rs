//! Statistics generation from the course database

use crate::storage::CourseStore;
use crate::Result;

/// Store statistics summary
#[derive(Debug, Clone)]
pub struct StoreStatistics {
    /// Total number of stored courses
    pub total_courses: u64,

    /// Number of courses marked expired
    pub expired_courses: u64,

    /// Course counts per source tag, largest first
    pub by_source: Vec<(String, u64)>,

    /// Course counts per category, largest first
    pub by_category: Vec<(String, u64)>,

    /// Most recent run's config hash, if any run is recorded
    pub latest_config_hash: Option<String>,
}

/// Loads statistics from the store
pub fn load_statistics<S: CourseStore>(store: &S) -> Result<StoreStatistics> {
    Ok(StoreStatistics {
        total_courses: store.count_total()?,
        expired_courses: store.count_expired()?,
        by_source: store.count_by_source()?,
        by_category: store.count_by_category()?,
        latest_config_hash: store.latest_run()?.map(|run| run.config_hash),
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Course Store Statistics ===\n");

    println!("Overview:");
    println!("  Total courses: {}", stats.total_courses);
    println!(
        "  Active: {}",
        stats.total_courses - stats.expired_courses
    );
    println!("  Expired: {}", stats.expired_courses);
    if let Some(hash) = &stats.latest_config_hash {
        println!("  Last run config: {}", hash);
    }
    println!();

    println!("Courses by Source:");
    for (source, count) in &stats.by_source {
        let percentage = if stats.total_courses > 0 {
            (*count as f64 / stats.total_courses as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", source, count, percentage);
    }
    println!();

    println!("Courses by Category:");
    for (category, count) in &stats.by_category {
        println!("  {}: {}", category, count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{NewCourse, SqliteStore};

    fn course(slug: &str, source: &str, category: &str) -> NewCourse {
        NewCourse {
            title: slug.to_string(),
            slug: slug.to_string(),
            image: "https://img.example.com/a.jpg".to_string(),
            target_link: format!("https://example.com/{}", slug),
            category: category.to_string(),
            source: source.to_string(),
        }
    }

    #[test]
    fn test_load_statistics() {
        let mut store = SqliteStore::new_in_memory().unwrap();
        store
            .insert_if_absent(&course("a", "couponscorpion", "Programming"))
            .unwrap();
        store
            .insert_if_absent(&course("b", "couponscorpion", "Database"))
            .unwrap();
        store
            .insert_if_absent(&course("c", "coursevania", "Programming"))
            .unwrap();
        let id = store.find_by_slug_or_title("c", "").unwrap().unwrap().id;
        store.mark_expired(id).unwrap();
        store.create_run("deadbeef").unwrap();

        let stats = load_statistics(&store).unwrap();

        assert_eq!(stats.total_courses, 3);
        assert_eq!(stats.expired_courses, 1);
        assert_eq!(stats.by_source[0], ("couponscorpion".to_string(), 2));
        assert_eq!(stats.by_category[0], ("Programming".to_string(), 2));
        assert_eq!(stats.latest_config_hash.as_deref(), Some("deadbeef"));
    }

    #[test]
    fn test_empty_store() {
        let store = SqliteStore::new_in_memory().unwrap();
        let stats = load_statistics(&store).unwrap();

        assert_eq!(stats.total_courses, 0);
        assert!(stats.by_source.is_empty());
        assert!(stats.latest_config_hash.is_none());
    }
}
