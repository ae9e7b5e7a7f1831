//! Attendees-by-Event DataLoader for batched fetching
//!
//! Two store calls per batch regardless of its size: the requested events
//! first, then every user referenced by any of their attendee sets.

use async_graphql::dataloader::Loader;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::User;
use crate::repositories::{Store, StoreError};

/// DataLoader for batching attendee lists
#[derive(Clone)]
pub struct AttendeesByEventLoader {
    store: Arc<dyn Store>,
}

impl AttendeesByEventLoader {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

impl Loader<Uuid> for AttendeesByEventLoader {
    type Value = Vec<User>;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let events = self.store.find_events_by_ids(keys).await.map_err(Arc::new)?;

        let attendee_ids: Vec<Uuid> = events
            .iter()
            .flat_map(|e| e.attendee_ids.iter().copied())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let users: HashMap<Uuid, User> = if attendee_ids.is_empty() {
            HashMap::new()
        } else {
            self.store
                .find_users_by_ids(&attendee_ids)
                .await
                .map_err(Arc::new)?
                .into_iter()
                .map(|u| (u.id, u))
                .collect()
        };

        let mut result: HashMap<Uuid, Vec<User>> =
            keys.iter().map(|k| (*k, Vec::new())).collect();
        for event in events {
            // Attendee ids without a matching user are dropped
            let attendees = event
                .attendee_ids
                .iter()
                .filter_map(|id| users.get(id).cloned())
                .collect();
            result.insert(event.id, attendees);
        }

        Ok(result)
    }
}
