//! Event service for Eventhub
//!
//! Business rules for event management:
//! - Only an event's creator may update or delete it
//! - Attending twice is a conflict; cancelling without attending is invalid
//! - Every successful mutation publishes a notification
//!
//! Methods take the [`RequestContext`] of the calling operation and read
//! the caller and pub/sub handle from it.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::instrument;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::graphql::pagination::{PageSource, PageWindow};
use crate::models::{Caller, Event, EventChanges, EventFilter, EventSort, NewEvent};
use crate::pubsub::Notification;
use crate::repositories::{Store, StoreError};

/// Format accepted for event start times
const TIME_FORMAT: &str = "%H:%M";

/// Raw event fields as submitted by a client
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub image_url: Option<String>,
}

/// Service for event mutations and listings
#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn Store>,
}

impl EventService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create an event owned by the caller
    #[instrument(skip(self, scope, draft), fields(title = %draft.title))]
    pub async fn create(&self, scope: &RequestContext, draft: EventDraft) -> ApiResult<Event> {
        let caller = scope.require_caller()?;
        let new_event = NewEvent {
            title: required("title", &draft.title)?,
            description: required("description", &draft.description)?,
            date: draft.date,
            time: normalize_time(&draft.time)?,
            location: required("location", &draft.location)?,
            image_url: optional_url(draft.image_url),
        };

        let event = self.store.insert_event(caller.id, new_event).await?;
        tracing::info!(event_id = %event.id, creator_id = %caller.id, "Event created");

        scope.pubsub.publish(Notification::EventCreated(event.clone()));
        Ok(event)
    }

    /// Apply a partial update to an event the caller created
    #[instrument(skip(self, scope, changes))]
    pub async fn update(
        &self,
        scope: &RequestContext,
        event_id: Uuid,
        changes: EventChanges,
    ) -> ApiResult<Event> {
        let caller = scope.require_caller()?;
        self.owned_event(caller, event_id).await?;

        let changes = EventChanges {
            title: changes.title.map(|t| required("title", &t)).transpose()?,
            description: changes
                .description
                .map(|d| required("description", &d))
                .transpose()?,
            date: changes.date,
            time: changes.time.map(|t| normalize_time(&t)).transpose()?,
            location: changes
                .location
                .map(|l| required("location", &l))
                .transpose()?,
            image_url: optional_url(changes.image_url),
        };

        let event = self
            .store
            .update_event(event_id, changes)
            .await?
            .ok_or_else(|| ApiError::not_found("event", event_id))?;
        tracing::info!(event_id = %event.id, "Event updated");

        scope.pubsub.publish(Notification::EventUpdated(event.clone()));
        Ok(event)
    }

    /// Delete an event the caller created
    #[instrument(skip(self, scope))]
    pub async fn delete(&self, scope: &RequestContext, event_id: Uuid) -> ApiResult<bool> {
        let caller = scope.require_caller()?;
        self.owned_event(caller, event_id).await?;

        if !self.store.delete_event(event_id).await? {
            return Err(ApiError::not_found("event", event_id));
        }
        tracing::info!(%event_id, "Event deleted");

        scope.pubsub.publish(Notification::EventDeleted(event_id));
        Ok(true)
    }

    /// Add the caller to an event's attendees
    #[instrument(skip(self, scope))]
    pub async fn attend(&self, scope: &RequestContext, event_id: Uuid) -> ApiResult<Event> {
        let caller = scope.require_caller()?;
        let event = self.existing_event(event_id).await?;
        if event.is_attended_by(caller.id) {
            return Err(ApiError::conflict("attendance", event_id));
        }

        let event = self
            .store
            .add_attendee(event_id, caller.id)
            .await?
            .ok_or_else(|| ApiError::not_found("event", event_id))?;
        tracing::info!(%event_id, user_id = %caller.id, "Attendance added");

        scope.pubsub.publish(Notification::AttendanceChanged {
            event: event.clone(),
            user_id: caller.id,
            attending: true,
        });
        Ok(event)
    }

    /// Remove the caller from an event's attendees
    #[instrument(skip(self, scope))]
    pub async fn cancel_attendance(
        &self,
        scope: &RequestContext,
        event_id: Uuid,
    ) -> ApiResult<Event> {
        let caller = scope.require_caller()?;
        let event = self.existing_event(event_id).await?;
        if !event.is_attended_by(caller.id) {
            return Err(ApiError::validation("you are not attending this event"));
        }

        let event = self
            .store
            .remove_attendee(event_id, caller.id)
            .await?
            .ok_or_else(|| ApiError::not_found("event", event_id))?;
        tracing::info!(%event_id, user_id = %caller.id, "Attendance cancelled");

        scope.pubsub.publish(Notification::AttendanceChanged {
            event: event.clone(),
            user_id: caller.id,
            attending: false,
        });
        Ok(event)
    }

    /// Paginated listing over the events matching `filter`
    pub fn listing(&self, filter: EventFilter, sort: EventSort) -> EventListing<'_> {
        EventListing {
            store: self.store.as_ref(),
            filter,
            sort,
        }
    }

    async fn existing_event(&self, event_id: Uuid) -> ApiResult<Event> {
        self.store
            .find_event(event_id)
            .await?
            .ok_or_else(|| ApiError::not_found("event", event_id))
    }

    async fn owned_event(&self, caller: &Caller, event_id: Uuid) -> ApiResult<Event> {
        let event = self.existing_event(event_id).await?;
        if event.creator_id != caller.id {
            return Err(ApiError::Forbidden(
                "only the event creator can modify this event".to_string(),
            ));
        }
        Ok(event)
    }
}

/// Filtered, sorted event collection for [`crate::graphql::pagination::paginate`]
pub struct EventListing<'a> {
    store: &'a dyn Store,
    filter: EventFilter,
    sort: EventSort,
}

impl PageSource for EventListing<'_> {
    type Item = Event;
    type Error = StoreError;

    async fn fetch_window(&self, window: PageWindow) -> Result<Vec<Event>, StoreError> {
        self.store
            .list_events(&self.filter, self.sort, window.skip(), u64::from(window.limit))
            .await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.store.count_events(&self.filter).await
    }
}

fn required(field: &str, value: &str) -> ApiResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

/// Accept `H:MM` or `HH:MM` and store it zero-padded
fn normalize_time(value: &str) -> ApiResult<String> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map(|t| t.format(TIME_FORMAT).to_string())
        .map_err(|_| ApiError::validation("time must be formatted as HH:MM"))
}

fn optional_url(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::pagination::paginate;
    use crate::pubsub::EventPubSub;
    use crate::repositories::MemoryStore;
    use assert_matches::assert_matches;

    struct Fixture {
        service: EventService,
        store: Arc<dyn Store>,
        pubsub: EventPubSub,
    }

    impl Fixture {
        fn new() -> Self {
            let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
            Self {
                service: EventService::new(store.clone()),
                store,
                pubsub: EventPubSub::new(),
            }
        }

        fn scope_for(&self, id: Uuid) -> RequestContext {
            let caller = Caller {
                id,
                email: format!("{id}@example.com"),
            };
            RequestContext::new(Some(caller), self.store.clone(), self.pubsub.clone())
        }
    }

    fn draft(title: &str) -> EventDraft {
        EventDraft {
            title: title.to_string(),
            description: "An evening of talks".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 9, 12).unwrap(),
            time: "7:05".to_string(),
            location: "Main Hall".to_string(),
            image_url: Some("  ".to_string()),
        }
    }

    #[test]
    fn test_normalize_time() {
        assert_eq!(normalize_time("7:05").unwrap(), "07:05");
        assert_eq!(normalize_time("23:59").unwrap(), "23:59");
        assert!(normalize_time("24:00").is_err());
        assert!(normalize_time("noon").is_err());
    }

    #[tokio::test]
    async fn test_create_validates_and_publishes() {
        let fx = Fixture::new();
        let creator = fx.scope_for(Uuid::new_v4());
        let mut rx = fx.pubsub.subscribe();

        assert_matches!(
            fx.service.create(&creator, draft("  ")).await,
            Err(ApiError::ValidationError(_))
        );

        let event = fx.service.create(&creator, draft("Rust Night")).await.unwrap();
        assert_eq!(event.time, "07:05");
        assert_eq!(event.image_url, None);
        assert_matches!(
            rx.recv().await.unwrap(),
            Notification::EventCreated(e) if e.id == event.id
        );
    }

    #[tokio::test]
    async fn test_only_creator_may_update_or_delete() {
        let fx = Fixture::new();
        let creator = fx.scope_for(Uuid::new_v4());
        let stranger = fx.scope_for(Uuid::new_v4());
        let event = fx.service.create(&creator, draft("Rust Night")).await.unwrap();

        let rename = EventChanges {
            title: Some("Rust Evening".to_string()),
            ..Default::default()
        };
        assert_matches!(
            fx.service.update(&stranger, event.id, rename.clone()).await,
            Err(ApiError::Forbidden(_))
        );
        assert_matches!(
            fx.service.delete(&stranger, event.id).await,
            Err(ApiError::Forbidden(_))
        );

        let updated = fx.service.update(&creator, event.id, rename).await.unwrap();
        assert_eq!(updated.title, "Rust Evening");
        assert!(fx.service.delete(&creator, event.id).await.unwrap());
        assert_matches!(
            fx.service.delete(&creator, event.id).await,
            Err(ApiError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn test_attendance_rules() {
        let fx = Fixture::new();
        let creator = fx.scope_for(Uuid::new_v4());
        let guest_id = Uuid::new_v4();
        let guest = fx.scope_for(guest_id);
        let event = fx.service.create(&creator, draft("Rust Night")).await.unwrap();

        assert_matches!(
            fx.service.cancel_attendance(&guest, event.id).await,
            Err(ApiError::ValidationError(_))
        );

        let attended = fx.service.attend(&guest, event.id).await.unwrap();
        assert_eq!(attended.attendee_ids, vec![guest_id]);
        assert_matches!(
            fx.service.attend(&guest, event.id).await,
            Err(ApiError::Conflict { .. })
        );

        let cancelled = fx.service.cancel_attendance(&guest, event.id).await.unwrap();
        assert!(cancelled.attendee_ids.is_empty());

        assert_matches!(
            fx.service.attend(&guest, Uuid::new_v4()).await,
            Err(ApiError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn test_creator_may_attend_own_event() {
        let fx = Fixture::new();
        let creator_id = Uuid::new_v4();
        let creator = fx.scope_for(creator_id);
        let event = fx.service.create(&creator, draft("Rust Night")).await.unwrap();

        let event = fx.service.attend(&creator, event.id).await.unwrap();
        assert!(event.is_attended_by(creator_id));
    }

    #[tokio::test]
    async fn test_listing_paginates_with_filter() {
        let fx = Fixture::new();
        let creator = fx.scope_for(Uuid::new_v4());
        for i in 0..5 {
            fx.service
                .create(&creator, draft(&format!("Rust Night {i}")))
                .await
                .unwrap();
        }
        fx.service.create(&creator, draft("Go Night")).await.unwrap();

        let filter = EventFilter {
            search: Some("rust".to_string()),
            ..Default::default()
        };
        let listing = fx.service.listing(filter, EventSort::DateAsc);
        let page = paginate(&listing, PageWindow::from_input(Some(2), Some(2)))
            .await
            .unwrap();

        assert_eq!(page.total_count, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.page_info.total_pages, 3);
        assert!(page.page_info.has_next_page);
        assert!(page.page_info.has_previous_page);
    }
}
