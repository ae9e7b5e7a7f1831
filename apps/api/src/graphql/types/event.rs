//! Event GraphQL type
//!
//! This module defines the GraphQL type for events with relationship resolvers
//! and fields personalized for the calling user.

use std::sync::Arc;

use async_graphql::{Context, Object, Result, ID};
use chrono::{DateTime, NaiveDate, Utc};

use crate::graphql::loaders::Loaders;
use crate::graphql::{loaders_for, request_context, GraphQLResultExt};
use crate::models::Event as DbEvent;

use super::user::User;

/// Event information exposed via GraphQL
pub struct Event {
    inner: DbEvent,
    /// Set for subscription pushes; otherwise the operation's loaders apply
    loaders: Option<Arc<Loaders>>,
}

impl Event {
    /// Create a new GraphQL Event from a database Event
    pub fn new(event: DbEvent) -> Self {
        Self::scoped(event, None)
    }

    /// An event whose relationships resolve through `loaders`
    pub fn with_loaders(event: DbEvent, loaders: Arc<Loaders>) -> Self {
        Self::scoped(event, Some(loaders))
    }

    pub(crate) fn scoped(event: DbEvent, loaders: Option<Arc<Loaders>>) -> Self {
        Self {
            inner: event,
            loaders,
        }
    }
}

impl From<DbEvent> for Event {
    fn from(event: DbEvent) -> Self {
        Self::new(event)
    }
}

#[Object]
impl Event {
    /// Unique event identifier
    async fn id(&self) -> ID {
        ID::from(self.inner.id.to_string())
    }

    async fn title(&self) -> &str {
        &self.inner.title
    }

    async fn description(&self) -> &str {
        &self.inner.description
    }

    /// Calendar date of the event
    async fn date(&self) -> NaiveDate {
        self.inner.date
    }

    /// Start time, `HH:MM`
    async fn time(&self) -> &str {
        &self.inner.time
    }

    async fn location(&self) -> &str {
        &self.inner.location
    }

    async fn image_url(&self) -> Option<&str> {
        self.inner.image_url.as_deref()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.inner.updated_at
    }

    /// Number of users attending
    async fn attendee_count(&self) -> usize {
        self.inner.attendee_ids.len()
    }

    /// Whether the caller attends this event (false when anonymous)
    async fn is_attending(&self, ctx: &Context<'_>) -> Result<bool> {
        let scope = request_context(ctx)?;
        Ok(scope
            .caller
            .as_ref()
            .is_some_and(|caller| self.inner.is_attended_by(caller.id)))
    }

    /// Whether the caller created this event (false when anonymous)
    async fn is_creator(&self, ctx: &Context<'_>) -> Result<bool> {
        let scope = request_context(ctx)?;
        Ok(scope
            .caller
            .as_ref()
            .is_some_and(|caller| caller.id == self.inner.creator_id))
    }

    // Relationship resolvers

    /// The user who created the event (batched)
    ///
    /// Null if the creator's account no longer exists.
    async fn creator(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let loaders = loaders_for(ctx, self.loaders.as_ref())?;
        let user = loaders.user(self.inner.creator_id).await.into_gql()?;
        Ok(user.map(|u| User::scoped(u, self.loaders.clone())))
    }

    /// Users attending the event (batched)
    async fn attendees(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let loaders = loaders_for(ctx, self.loaders.as_ref())?;
        let users = loaders.attendees_of(self.inner.id).await.into_gql()?;
        Ok(users
            .into_iter()
            .map(|u| User::scoped(u, self.loaders.clone()))
            .collect())
    }
}
