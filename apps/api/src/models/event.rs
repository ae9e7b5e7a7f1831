//! Event models
//!
//! Events carry their attendee set inline (`attendee_ids`), which is what the
//! relationship loaders partition on.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Event record from the events table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Event {
    /// Unique event identifier
    pub id: Uuid,

    pub title: String,

    pub description: String,

    /// Calendar date the event takes place on
    pub date: NaiveDate,

    /// Start time formatted as `HH:MM`
    pub time: String,

    pub location: String,

    /// Optional cover image
    pub image_url: Option<String>,

    /// User who created the event
    pub creator_id: Uuid,

    /// Users attending the event, without duplicates
    pub attendee_ids: Vec<Uuid>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Check whether `user_id` is in the attendee set
    pub fn is_attended_by(&self, user_id: Uuid) -> bool {
        self.attendee_ids.contains(&user_id)
    }
}

/// Data required to insert a new event
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub image_url: Option<String>,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

impl EventChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.location.is_none()
            && self.image_url.is_none()
    }

    /// Apply the changes to an in-memory event
    pub fn apply_to(&self, event: &mut Event) {
        if let Some(title) = &self.title {
            event.title = title.clone();
        }
        if let Some(description) = &self.description {
            event.description = description.clone();
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(time) = &self.time {
            event.time = time.clone();
        }
        if let Some(location) = &self.location {
            event.location = location.clone();
        }
        if let Some(image_url) = &self.image_url {
            event.image_url = Some(image_url.clone());
        }
    }
}

/// Filter applied to event listings and their counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Only events on this date
    pub date: Option<NaiveDate>,

    /// Only events created by this user
    pub creator_id: Option<Uuid>,

    /// Case-insensitive substring match on title, description or location
    pub search: Option<String>,
}

impl EventFilter {
    /// Whether `event` satisfies every set criterion
    pub fn matches(&self, event: &Event) -> bool {
        if self.date.is_some_and(|date| event.date != date) {
            return false;
        }
        if self.creator_id.is_some_and(|id| event.creator_id != id) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                event.title.to_lowercase().contains(&term)
                    || event.description.to_lowercase().contains(&term)
                    || event.location.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }
}

/// Sort order for event listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventSort {
    /// Soonest first
    #[default]
    DateAsc,
    /// Latest first
    DateDesc,
    /// Most recently created first
    Newest,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(title: &str, location: &str) -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: "Monthly meetup".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            time: "18:30".to_string(),
            location: location.to_string(),
            image_url: None,
            creator_id: Uuid::new_v4(),
            attendee_ids: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(EventFilter::default().matches(&event("Rust Night", "Berlin")));
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let e = event("Rust Night", "Berlin");
        let by_title = EventFilter {
            search: Some("rust".to_string()),
            ..Default::default()
        };
        let by_location = EventFilter {
            search: Some("BERLIN".to_string()),
            ..Default::default()
        };
        let miss = EventFilter {
            search: Some("paris".to_string()),
            ..Default::default()
        };
        assert!(by_title.matches(&e));
        assert!(by_location.matches(&e));
        assert!(!miss.matches(&e));
    }

    #[test]
    fn test_date_and_creator_filters() {
        let e = event("Rust Night", "Berlin");
        let wrong_date = EventFilter {
            date: NaiveDate::from_ymd_opt(2025, 3, 15),
            ..Default::default()
        };
        let right_creator = EventFilter {
            creator_id: Some(e.creator_id),
            ..Default::default()
        };
        assert!(!wrong_date.matches(&e));
        assert!(right_creator.matches(&e));
    }

    #[test]
    fn test_apply_changes_leaves_unset_fields() {
        let mut e = event("Rust Night", "Berlin");
        let changes = EventChanges {
            title: Some("Rust Evening".to_string()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
        changes.apply_to(&mut e);
        assert_eq!(e.title, "Rust Evening");
        assert_eq!(e.location, "Berlin");
    }
}
