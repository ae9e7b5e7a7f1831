//! Event DataLoader for batched fetching

use async_graphql::dataloader::Loader;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::Event;
use crate::repositories::{Store, StoreError};

/// DataLoader for batching event queries
#[derive(Clone)]
pub struct EventLoader {
    store: Arc<dyn Store>,
}

impl EventLoader {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

impl Loader<Uuid> for EventLoader {
    type Value = Option<Event>;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let events = self.store.find_events_by_ids(keys).await.map_err(Arc::new)?;

        let mut result: HashMap<Uuid, Option<Event>> = keys.iter().map(|k| (*k, None)).collect();
        for event in events {
            result.insert(event.id, Some(event));
        }
        Ok(result)
    }
}
