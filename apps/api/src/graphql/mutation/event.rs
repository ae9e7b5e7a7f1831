//! Event mutations
//!
//! Each resolver runs a handler below wrapped with [`require_auth`], so
//! anonymous calls fail before the service is touched.

use async_graphql::{Context, InputObject, Object, Result, ID};
use chrono::NaiveDate;

use crate::context::RequestContext;
use crate::error::ApiResult;
use crate::graphql::guards::require_auth;
use crate::graphql::types::Event;
use crate::graphql::{parse_id, request_context, GraphQLResultExt};
use crate::models::{Event as DbEvent, EventChanges};
use crate::services::EventDraft;

/// Input for creating an event
#[derive(Debug, InputObject)]
pub struct CreateEventInput {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    /// Start time, `HH:MM`
    pub time: String,
    pub location: String,
    pub image_url: Option<String>,
}

impl From<CreateEventInput> for EventDraft {
    fn from(input: CreateEventInput) -> Self {
        Self {
            title: input.title,
            description: input.description,
            date: input.date,
            time: input.time,
            location: input.location,
            image_url: input.image_url,
        }
    }
}

/// Input for updating an event; omitted fields are left unchanged
#[derive(Debug, Default, InputObject)]
pub struct UpdateEventInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

impl From<UpdateEventInput> for EventChanges {
    fn from(input: UpdateEventInput) -> Self {
        Self {
            title: input.title,
            description: input.description,
            date: input.date,
            time: input.time,
            location: input.location,
            image_url: input.image_url,
        }
    }
}

async fn create(scope: RequestContext, draft: EventDraft) -> ApiResult<DbEvent> {
    scope.events().create(&scope, draft).await
}

async fn update(scope: RequestContext, (id, changes): (ID, EventChanges)) -> ApiResult<DbEvent> {
    let id = parse_id(&id)?;
    scope.events().update(&scope, id, changes).await
}

async fn delete(scope: RequestContext, id: ID) -> ApiResult<bool> {
    let id = parse_id(&id)?;
    scope.events().delete(&scope, id).await
}

async fn attend(scope: RequestContext, id: ID) -> ApiResult<DbEvent> {
    let id = parse_id(&id)?;
    scope.events().attend(&scope, id).await
}

async fn cancel(scope: RequestContext, id: ID) -> ApiResult<DbEvent> {
    let id = parse_id(&id)?;
    scope.events().cancel_attendance(&scope, id).await
}

#[derive(Default)]
pub struct EventMutation;

#[Object]
impl EventMutation {
    /// Create an event owned by the caller
    async fn create_event(&self, ctx: &Context<'_>, input: CreateEventInput) -> Result<Event> {
        let scope = request_context(ctx)?.clone();
        let event = require_auth(create)(scope, input.into()).await.into_gql()?;
        Ok(event.into())
    }

    /// Update an event the caller created
    async fn update_event(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateEventInput,
    ) -> Result<Event> {
        let scope = request_context(ctx)?.clone();
        let event = require_auth(update)(scope, (id, input.into()))
            .await
            .into_gql()?;
        Ok(event.into())
    }

    /// Delete an event the caller created
    async fn delete_event(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let scope = request_context(ctx)?.clone();
        require_auth(delete)(scope, id).await.into_gql()
    }

    /// Join an event's attendees
    async fn attend_event(&self, ctx: &Context<'_>, id: ID) -> Result<Event> {
        let scope = request_context(ctx)?.clone();
        let event = require_auth(attend)(scope, id).await.into_gql()?;
        Ok(event.into())
    }

    /// Leave an event's attendees
    async fn cancel_attendance(&self, ctx: &Context<'_>, id: ID) -> Result<Event> {
        let scope = request_context(ctx)?.clone();
        let event = require_auth(cancel)(scope, id).await.into_gql()?;
        Ok(event.into())
    }
}
