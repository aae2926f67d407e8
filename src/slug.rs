//! Slug derivation for course titles
//!
//! Slugs are the primary dedup key for stored courses, so derivation must be
//! deterministic: the same title always yields the same slug, across runs and
//! across sources.

/// Derives a URL-safe slug from a course title
///
/// Rules:
/// - ASCII letters and digits are lowercased and kept
/// - every other run of characters collapses to a single `-`
/// - leading/trailing `-` are trimmed
///
/// # Example
///
/// ```
/// use coursepress::slug::slugify;
///
/// assert_eq!(slugify("Complete Python Bootcamp 2024!"), "complete-python-bootcamp-2024");
/// ```
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}
