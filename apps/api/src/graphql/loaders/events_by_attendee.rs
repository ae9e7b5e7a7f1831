//! Events-by-Attendee DataLoader for batched fetching
//!
//! One event may be attended by several of the requested users, in which
//! case it is placed under each of them.

use async_graphql::dataloader::Loader;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::Event;
use crate::repositories::{Store, StoreError};

/// DataLoader for batching events-by-attendee queries
#[derive(Clone)]
pub struct EventsByAttendeeLoader {
    store: Arc<dyn Store>,
}

impl EventsByAttendeeLoader {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

impl Loader<Uuid> for EventsByAttendeeLoader {
    type Value = Vec<Event>;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let events = self
            .store
            .find_events_by_attendees(keys)
            .await
            .map_err(Arc::new)?;

        let mut result: HashMap<Uuid, Vec<Event>> =
            keys.iter().map(|k| (*k, Vec::new())).collect();
        for event in events {
            for attendee in &event.attendee_ids {
                if let Some(bucket) = result.get_mut(attendee) {
                    bucket.push(event.clone());
                }
            }
        }

        Ok(result)
    }
}
