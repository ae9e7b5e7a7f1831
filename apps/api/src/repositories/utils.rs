//! Shared utility functions for repositories
//!
//! This module provides common functions used across repositories.

use crate::models::EventSort;

/// Escape special characters in ILIKE patterns to prevent pattern injection.
///
/// ILIKE uses `%` for any sequence and `_` for single character wildcards.
/// If user input contains these characters, they must be escaped to match literally.
///
/// # Example
/// ```
/// use eventhub_api::repositories::utils::escape_ilike;
///
/// let input = "100%";
/// let escaped = escape_ilike(input);
/// assert_eq!(escaped, r"100\%");
/// ```
pub fn escape_ilike(pattern: &str) -> String {
    pattern
        .replace('\\', r"\\")
        .replace('%', r"\%")
        .replace('_', r"\_")
}

// ============================================================================
// SQL Column Constants
// ============================================================================

/// SQL columns for user queries
pub const USER_COLUMNS: &str = r#"
    id, name, email, password_hash, created_at, updated_at
"#;

/// SQL columns for event queries
pub const EVENT_COLUMNS: &str = r#"
    id, title, description, date, time, location, image_url,
    creator_id, attendee_ids, created_at, updated_at
"#;

/// ORDER BY clause for a listing sort; ties always break on id
pub fn order_by(sort: EventSort) -> &'static str {
    match sort {
        EventSort::DateAsc => "date ASC, time ASC, created_at ASC, id ASC",
        EventSort::DateDesc => "date DESC, time DESC, created_at DESC, id DESC",
        EventSort::Newest => "created_at DESC, id DESC",
    }
}
