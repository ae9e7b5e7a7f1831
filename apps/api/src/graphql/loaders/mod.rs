//! DataLoader implementations for GraphQL
//!
//! This module provides DataLoader implementations to solve N+1 query problems
//! in GraphQL relationship resolvers. Each loader batches every key requested
//! before the runtime yields into a single store call.
//!
//! There are two types of loaders:
//! - Single-entity loaders: `Option<T>` per id, so absence is cached too
//! - Collection loaders: `Vec<T>` per parent id, empty when nothing matches
//!
//! A [`Loaders`] set is built for exactly one GraphQL operation, or one
//! subscription push, and dropped with it. Batches are unbounded so every
//! key gathered in a tick goes to the store in one call. Failed batches are
//! never cached; the next load retries.

mod attendees_by_event;
mod event;
mod events_by_attendee;
mod events_by_creator;
mod user;

pub use attendees_by_event::AttendeesByEventLoader;
pub use event::EventLoader;
pub use events_by_attendee::EventsByAttendeeLoader;
pub use events_by_creator::EventsByCreatorLoader;
pub use user::UserLoader;

use std::sync::Arc;

use async_graphql::dataloader::{DataLoader, HashMapCache};
use uuid::Uuid;

use crate::models::{Event, User};
use crate::repositories::{Store, StoreError};

/// DataLoader with a per-instance memoization cache
pub type CachedLoader<T> = DataLoader<T, HashMapCache>;

/// Error shared by every pending load in a failed batch
pub type LoadError = Arc<StoreError>;

fn cached<T>(loader: T) -> CachedLoader<T>
where
    T: async_graphql::dataloader::Loader<Uuid>,
{
    DataLoader::with_cache(loader, tokio::spawn, HashMapCache::default())
        .max_batch_size(usize::MAX)
}

/// The five loaders of one GraphQL operation
pub struct Loaders {
    pub users: CachedLoader<UserLoader>,
    pub events: CachedLoader<EventLoader>,
    pub events_by_creator: CachedLoader<EventsByCreatorLoader>,
    pub events_by_attendee: CachedLoader<EventsByAttendeeLoader>,
    pub attendees_by_event: CachedLoader<AttendeesByEventLoader>,
}

impl Loaders {
    /// Create a fresh, empty set of loaders over `store`
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            users: cached(UserLoader::new(store.clone())),
            events: cached(EventLoader::new(store.clone())),
            events_by_creator: cached(EventsByCreatorLoader::new(store.clone())),
            events_by_attendee: cached(EventsByAttendeeLoader::new(store.clone())),
            attendees_by_event: cached(AttendeesByEventLoader::new(store)),
        }
    }

    pub async fn user(&self, id: Uuid) -> Result<Option<User>, LoadError> {
        Ok(self.users.load_one(id).await?.flatten())
    }

    pub async fn event(&self, id: Uuid) -> Result<Option<Event>, LoadError> {
        Ok(self.events.load_one(id).await?.flatten())
    }

    pub async fn events_created_by(&self, user_id: Uuid) -> Result<Vec<Event>, LoadError> {
        Ok(self
            .events_by_creator
            .load_one(user_id)
            .await?
            .unwrap_or_default())
    }

    pub async fn events_attended_by(&self, user_id: Uuid) -> Result<Vec<Event>, LoadError> {
        Ok(self
            .events_by_attendee
            .load_one(user_id)
            .await?
            .unwrap_or_default())
    }

    pub async fn attendees_of(&self, event_id: Uuid) -> Result<Vec<User>, LoadError> {
        Ok(self
            .attendees_by_event
            .load_one(event_id)
            .await?
            .unwrap_or_default())
    }
}
