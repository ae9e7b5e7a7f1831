//! Persistence layer for Eventhub
//!
//! Everything above this module talks to storage through the [`Store`] trait.
//! Two adapters implement it:
//! - [`PgStore`], backed by PostgreSQL through [`UserRepository`] and
//!   [`EventRepository`]
//! - [`MemoryStore`], an in-process store used for local development and tests

pub mod event;
pub mod memory;
pub mod pg;
pub mod user;
pub mod utils;

pub use event::EventRepository;
pub use memory::MemoryStore;
pub use pg::PgStore;
pub use user::UserRepository;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Event, EventChanges, EventFilter, EventSort, NewEvent, NewUser, User};

/// Errors raised by a [`Store`] implementation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("email address is already registered")]
    DuplicateEmail,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage operations the API depends on
///
/// Id-set lookups return matches in no particular order and silently omit
/// ids that do not exist; callers redistribute results themselves.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>>;

    /// Case-insensitive lookup
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Fails with [`StoreError::DuplicateEmail`] if the email is taken
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_events_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Event>>;

    /// Events whose creator is any of `creator_ids`, in listing order
    async fn find_events_by_creators(&self, creator_ids: &[Uuid]) -> StoreResult<Vec<Event>>;

    /// Events whose attendee set intersects `user_ids`, in listing order
    async fn find_events_by_attendees(&self, user_ids: &[Uuid]) -> StoreResult<Vec<Event>>;

    async fn list_events(
        &self,
        filter: &EventFilter,
        sort: EventSort,
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<Event>>;

    async fn count_events(&self, filter: &EventFilter) -> StoreResult<u64>;

    async fn insert_event(&self, creator_id: Uuid, event: NewEvent) -> StoreResult<Event>;

    async fn update_event(&self, id: Uuid, changes: EventChanges) -> StoreResult<Option<Event>>;

    /// Returns false if no event had this id
    async fn delete_event(&self, id: Uuid) -> StoreResult<bool>;

    /// Idempotent; `None` if the event does not exist
    async fn add_attendee(&self, event_id: Uuid, user_id: Uuid) -> StoreResult<Option<Event>>;

    /// Idempotent; `None` if the event does not exist
    async fn remove_attendee(&self, event_id: Uuid, user_id: Uuid)
        -> StoreResult<Option<Event>>;

    async fn find_event(&self, id: Uuid) -> StoreResult<Option<Event>> {
        Ok(self.find_events_by_ids(&[id]).await?.into_iter().next())
    }
}
