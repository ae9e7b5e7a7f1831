//! Store spy for integration tests
//!
//! [`CountingStore`] forwards to a [`MemoryStore`] while recording every
//! id-set lookup. It can also fail the next call or reverse result order to
//! exercise the loaders' redistribution logic.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use eventhub_api::models::{Event, EventChanges, EventFilter, EventSort, NewEvent, NewUser, User};
use eventhub_api::repositories::{MemoryStore, Store, StoreError, StoreResult};

/// Store operations tracked by [`CountingStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    UsersByIds,
    EventsByIds,
    EventsByCreators,
    EventsByAttendees,
    ListEvents,
    CountEvents,
}

#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    calls: Mutex<Vec<(Call, usize)>>,
    fail_next: AtomicBool,
    reverse: AtomicBool,
}

impl CountingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The wrapped store, for seeding data without recording calls
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// Number of recorded calls of `kind`
    pub fn calls(&self, kind: Call) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(call, _)| *call == kind)
            .count()
    }

    /// Key counts passed to each recorded call of `kind`
    pub fn batch_sizes(&self, kind: Call) -> Vec<usize> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(call, _)| *call == kind)
            .map(|(_, size)| *size)
            .collect()
    }

    pub fn reset(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Make the next tracked call fail with [`StoreError::Unavailable`]
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Return id-set lookups in reverse order
    pub fn reverse_results(&self) {
        self.reverse.store(true, Ordering::SeqCst);
    }

    fn record(&self, kind: Call, size: usize) -> StoreResult<()> {
        self.calls.lock().unwrap().push((kind, size));
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }

    fn arrange<T>(&self, mut rows: Vec<T>) -> Vec<T> {
        if self.reverse.load(Ordering::SeqCst) {
            rows.reverse();
        }
        rows
    }
}

#[async_trait]
impl Store for CountingStore {
    async fn find_users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        self.record(Call::UsersByIds, ids.len())?;
        Ok(self.arrange(self.inner.find_users_by_ids(ids).await?))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.inner.find_user_by_email(email).await
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        self.inner.insert_user(user).await
    }

    async fn find_events_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Event>> {
        self.record(Call::EventsByIds, ids.len())?;
        Ok(self.arrange(self.inner.find_events_by_ids(ids).await?))
    }

    async fn find_events_by_creators(&self, creator_ids: &[Uuid]) -> StoreResult<Vec<Event>> {
        self.record(Call::EventsByCreators, creator_ids.len())?;
        Ok(self.arrange(self.inner.find_events_by_creators(creator_ids).await?))
    }

    async fn find_events_by_attendees(&self, user_ids: &[Uuid]) -> StoreResult<Vec<Event>> {
        self.record(Call::EventsByAttendees, user_ids.len())?;
        Ok(self.arrange(self.inner.find_events_by_attendees(user_ids).await?))
    }

    async fn list_events(
        &self,
        filter: &EventFilter,
        sort: EventSort,
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<Event>> {
        self.record(Call::ListEvents, 0)?;
        self.inner.list_events(filter, sort, skip, limit).await
    }

    async fn count_events(&self, filter: &EventFilter) -> StoreResult<u64> {
        self.record(Call::CountEvents, 0)?;
        self.inner.count_events(filter).await
    }

    async fn insert_event(&self, creator_id: Uuid, event: NewEvent) -> StoreResult<Event> {
        self.inner.insert_event(creator_id, event).await
    }

    async fn update_event(&self, id: Uuid, changes: EventChanges) -> StoreResult<Option<Event>> {
        self.inner.update_event(id, changes).await
    }

    async fn delete_event(&self, id: Uuid) -> StoreResult<bool> {
        self.inner.delete_event(id).await
    }

    async fn add_attendee(&self, event_id: Uuid, user_id: Uuid) -> StoreResult<Option<Event>> {
        self.inner.add_attendee(event_id, user_id).await
    }

    async fn remove_attendee(&self, event_id: Uuid, user_id: Uuid) -> StoreResult<Option<Event>> {
        self.inner.remove_attendee(event_id, user_id).await
    }
}
