//! User GraphQL type
//!
//! Relationship fields resolve through the request's loaders, so listing
//! many users with their events costs one store call per relationship.

use std::sync::Arc;

use async_graphql::{Context, Object, Result, ID};
use chrono::{DateTime, Utc};

use crate::graphql::loaders::Loaders;
use crate::graphql::{loaders_for, GraphQLResultExt};
use crate::models::User as DbUser;

use super::event::Event;

/// User account information exposed via GraphQL
pub struct User {
    inner: DbUser,
    loaders: Option<Arc<Loaders>>,
}

impl User {
    /// Create a new GraphQL User from a database User
    pub fn new(user: DbUser) -> Self {
        Self::scoped(user, None)
    }

    /// A user whose relationships resolve through `loaders` when given
    pub(crate) fn scoped(user: DbUser, loaders: Option<Arc<Loaders>>) -> Self {
        Self {
            inner: user,
            loaders,
        }
    }
}

impl From<DbUser> for User {
    fn from(user: DbUser) -> Self {
        Self::new(user)
    }
}

#[Object]
impl User {
    /// Unique user identifier
    async fn id(&self) -> ID {
        ID::from(self.inner.id.to_string())
    }

    /// Display name
    async fn name(&self) -> &str {
        &self.inner.name
    }

    /// Email address
    async fn email(&self) -> &str {
        &self.inner.email
    }

    /// Account creation timestamp
    async fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    /// Last profile update timestamp
    async fn updated_at(&self) -> DateTime<Utc> {
        self.inner.updated_at
    }

    // Relationship resolvers

    /// Events this user created (batched)
    async fn created_events(&self, ctx: &Context<'_>) -> Result<Vec<Event>> {
        let loaders = loaders_for(ctx, self.loaders.as_ref())?;
        let events = loaders.events_created_by(self.inner.id).await.into_gql()?;
        Ok(events
            .into_iter()
            .map(|e| Event::scoped(e, self.loaders.clone()))
            .collect())
    }

    /// Events this user is attending (batched)
    async fn attending_events(&self, ctx: &Context<'_>) -> Result<Vec<Event>> {
        let loaders = loaders_for(ctx, self.loaders.as_ref())?;
        let events = loaders.events_attended_by(self.inner.id).await.into_gql()?;
        Ok(events
            .into_iter()
            .map(|e| Event::scoped(e, self.loaders.clone()))
            .collect())
    }
}
