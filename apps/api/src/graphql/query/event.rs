//! Event queries

use async_graphql::{Context, Enum, InputObject, Object, Result, ID};
use chrono::NaiveDate;

use crate::graphql::guards::AuthGuard;
use crate::graphql::pagination::{paginate, PageWindow};
use crate::graphql::types::{Event, PaginatedEvents};
use crate::graphql::{parse_id, request_context, GraphQLResultExt};
use crate::models::{EventFilter, EventSort};
use crate::services::EventService;

/// Criteria for narrowing an event listing
#[derive(Debug, Default, InputObject)]
pub struct EventFilterInput {
    /// Only events on this date
    pub date: Option<NaiveDate>,
    /// Only events created by this user
    pub creator_id: Option<ID>,
    /// Case-insensitive match on title, description or location
    pub search: Option<String>,
}

impl EventFilterInput {
    fn into_filter(self) -> crate::error::ApiResult<EventFilter> {
        Ok(EventFilter {
            date: self.date,
            creator_id: self.creator_id.as_ref().map(parse_id).transpose()?,
            search: self.search,
        })
    }
}

/// Ordering of event listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Enum)]
pub enum EventSortInput {
    /// Soonest first
    #[default]
    DateAsc,
    /// Latest first
    DateDesc,
    /// Most recently created first
    Newest,
}

impl From<EventSortInput> for EventSort {
    fn from(sort: EventSortInput) -> Self {
        match sort {
            EventSortInput::DateAsc => Self::DateAsc,
            EventSortInput::DateDesc => Self::DateDesc,
            EventSortInput::Newest => Self::Newest,
        }
    }
}

#[derive(Default)]
pub struct EventQuery;

#[Object]
impl EventQuery {
    /// Look up an event by id; null if no such event
    async fn event(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Event>> {
        let id = parse_id(&id).into_gql()?;
        let scope = request_context(ctx)?;
        let event = scope.loaders.event(id).await.into_gql()?;
        Ok(event.map(Event::from))
    }

    /// Paginated event listing
    ///
    /// `page` defaults to 1 and `limit` to 10; non-positive values fall back
    /// to those defaults and `limit` is capped at 100.
    async fn events(
        &self,
        ctx: &Context<'_>,
        page: Option<i32>,
        limit: Option<i32>,
        filter: Option<EventFilterInput>,
        #[graphql(default)] sort: EventSortInput,
    ) -> Result<PaginatedEvents> {
        let filter = filter.unwrap_or_default().into_filter().into_gql()?;
        let service = ctx.data::<EventService>()?;

        let listing = service.listing(filter, sort.into());
        let page = paginate(&listing, PageWindow::from_input(page, limit))
            .await
            .into_gql()?;
        Ok(page.into())
    }

    /// Events created by the signed-in user, soonest first
    #[graphql(guard = "AuthGuard")]
    async fn my_events(
        &self,
        ctx: &Context<'_>,
        page: Option<i32>,
        limit: Option<i32>,
    ) -> Result<PaginatedEvents> {
        let scope = request_context(ctx)?;
        let caller = scope.require_caller().into_gql()?;
        let service = ctx.data::<EventService>()?;

        let filter = EventFilter {
            creator_id: Some(caller.id),
            ..Default::default()
        };
        let listing = service.listing(filter, EventSort::DateAsc);
        let page = paginate(&listing, PageWindow::from_input(page, limit))
            .await
            .into_gql()?;
        Ok(page.into())
    }
}
