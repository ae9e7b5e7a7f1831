//! Events-by-Creator DataLoader for batched fetching
//!
//! Resolves `User.createdEvents` for many users with one store call,
//! partitioning the result by creator id.

use async_graphql::dataloader::Loader;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::Event;
use crate::repositories::{Store, StoreError};

/// DataLoader for batching events-by-creator queries
#[derive(Clone)]
pub struct EventsByCreatorLoader {
    store: Arc<dyn Store>,
}

impl EventsByCreatorLoader {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

impl Loader<Uuid> for EventsByCreatorLoader {
    type Value = Vec<Event>;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let events = self
            .store
            .find_events_by_creators(keys)
            .await
            .map_err(Arc::new)?;

        // Group events by creator_id
        let mut result: HashMap<Uuid, Vec<Event>> = HashMap::new();
        for event in events {
            result.entry(event.creator_id).or_default().push(event);
        }

        // Ensure all requested keys have an entry (even if empty)
        for key in keys {
            result.entry(*key).or_default();
        }

        Ok(result)
    }
}
