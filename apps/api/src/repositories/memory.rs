//! In-process [`Store`] backed by concurrent hash maps
//!
//! Mirrors the filtering and ordering of the PostgreSQL adapter so listings
//! behave the same in development and tests.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::{Event, EventChanges, EventFilter, EventSort, NewEvent, NewUser, User};

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, User>,
    /// Lowercased email to user id
    emails: DashMap<String, Uuid>,
    events: DashMap<Uuid, Event>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted_events(&self, filter: impl Fn(&Event) -> bool, sort: EventSort) -> Vec<Event> {
        let mut events: Vec<Event> = self
            .events
            .iter()
            .filter(|entry| filter(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        events.sort_by(|a, b| compare(a, b, sort));
        events
    }

    fn modify_event(&self, id: Uuid, f: impl FnOnce(&mut Event)) -> Option<Event> {
        let mut entry = self.events.get_mut(&id)?;
        f(entry.value_mut());
        Some(entry.value().clone())
    }
}

fn compare(a: &Event, b: &Event, sort: EventSort) -> Ordering {
    let ascending = (&a.date, &a.time, &a.created_at, &a.id)
        .cmp(&(&b.date, &b.time, &b.created_at, &b.id));
    match sort {
        EventSort::DateAsc => ascending,
        EventSort::DateDesc => ascending.reverse(),
        EventSort::Newest => (&b.created_at, &b.id).cmp(&(&a.created_at, &a.id)),
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| u.value().clone()))
            .collect())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let Some(id) = self.emails.get(&email.to_lowercase()).map(|e| *e.value()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let email = user.email.to_lowercase();
        match self.emails.entry(email.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateEmail),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let user = User {
                    id: Uuid::new_v4(),
                    name: user.name,
                    email,
                    password_hash: user.password_hash,
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(user.id);
                self.users.insert(user.id, user.clone());
                Ok(user)
            }
        }
    }

    async fn find_events_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Event>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.events.get(id).map(|e| e.value().clone()))
            .collect())
    }

    async fn find_events_by_creators(&self, creator_ids: &[Uuid]) -> StoreResult<Vec<Event>> {
        Ok(self.sorted_events(|e| creator_ids.contains(&e.creator_id), EventSort::DateAsc))
    }

    async fn find_events_by_attendees(&self, user_ids: &[Uuid]) -> StoreResult<Vec<Event>> {
        Ok(self.sorted_events(
            |e| e.attendee_ids.iter().any(|id| user_ids.contains(id)),
            EventSort::DateAsc,
        ))
    }

    async fn list_events(
        &self,
        filter: &EventFilter,
        sort: EventSort,
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<Event>> {
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(self
            .sorted_events(|e| filter.matches(e), sort)
            .into_iter()
            .skip(skip)
            .take(limit)
            .collect())
    }

    async fn count_events(&self, filter: &EventFilter) -> StoreResult<u64> {
        let count = self.events.iter().filter(|e| filter.matches(e.value())).count();
        Ok(count as u64)
    }

    async fn insert_event(&self, creator_id: Uuid, event: NewEvent) -> StoreResult<Event> {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            title: event.title,
            description: event.description,
            date: event.date,
            time: event.time,
            location: event.location,
            image_url: event.image_url,
            creator_id,
            attendee_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update_event(&self, id: Uuid, changes: EventChanges) -> StoreResult<Option<Event>> {
        Ok(self.modify_event(id, |event| {
            changes.apply_to(event);
            event.updated_at = Utc::now();
        }))
    }

    async fn delete_event(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.events.remove(&id).is_some())
    }

    async fn add_attendee(&self, event_id: Uuid, user_id: Uuid) -> StoreResult<Option<Event>> {
        Ok(self.modify_event(event_id, |event| {
            if !event.attendee_ids.contains(&user_id) {
                event.attendee_ids.push(user_id);
                event.updated_at = Utc::now();
            }
        }))
    }

    async fn remove_attendee(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<Event>> {
        Ok(self.modify_event(event_id, |event| {
            let before = event.attendee_ids.len();
            event.attendee_ids.retain(|id| *id != user_id);
            if event.attendee_ids.len() != before {
                event.updated_at = Utc::now();
            }
        }))
    }
}
