//! PostgreSQL-backed [`Store`]

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{EventRepository, Store, StoreError, StoreResult, UserRepository};
use crate::models::{Event, EventChanges, EventFilter, EventSort, NewEvent, NewUser, User};

/// Store adapter over the user and event repositories
#[derive(Clone)]
pub struct PgStore {
    users: UserRepository,
    events: EventRepository,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            events: EventRepository::new(pool),
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        Ok(self.users.find_by_ids(ids).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.users.find_by_email(email).await?)
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        match self.users.create(&user).await {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_events_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Event>> {
        Ok(self.events.find_by_ids(ids).await?)
    }

    async fn find_events_by_creators(&self, creator_ids: &[Uuid]) -> StoreResult<Vec<Event>> {
        Ok(self.events.find_by_creators(creator_ids).await?)
    }

    async fn find_events_by_attendees(&self, user_ids: &[Uuid]) -> StoreResult<Vec<Event>> {
        Ok(self.events.find_by_attendees(user_ids).await?)
    }

    async fn list_events(
        &self,
        filter: &EventFilter,
        sort: EventSort,
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<Event>> {
        Ok(self.events.list(filter, sort, skip, limit).await?)
    }

    async fn count_events(&self, filter: &EventFilter) -> StoreResult<u64> {
        Ok(self.events.count(filter).await?)
    }

    async fn insert_event(&self, creator_id: Uuid, event: NewEvent) -> StoreResult<Event> {
        Ok(self.events.create(creator_id, &event).await?)
    }

    async fn update_event(&self, id: Uuid, changes: EventChanges) -> StoreResult<Option<Event>> {
        Ok(self.events.update(id, &changes).await?)
    }

    async fn delete_event(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.events.delete(id).await?)
    }

    async fn add_attendee(&self, event_id: Uuid, user_id: Uuid) -> StoreResult<Option<Event>> {
        Ok(self.events.add_attendee(event_id, user_id).await?)
    }

    async fn remove_attendee(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<Event>> {
        Ok(self.events.remove_attendee(event_id, user_id).await?)
    }
}
