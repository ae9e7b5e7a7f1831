//! GraphQL subscriptions for Eventhub
//!
//! Each subscription filters the shared notification stream of the
//! connection's [`RequestContext`]. Every pushed event gets its own empty
//! loaders, so relationship fields reflect the store at push time rather
//! than whatever an earlier push cached.

use async_graphql::{Context, Result, Subscription, ID};
use futures_util::{Stream, StreamExt};

use crate::graphql::types::{AttendanceChange, Event};
use crate::graphql::{parse_id, request_context, GraphQLResultExt};
use crate::pubsub::Notification;

#[derive(Default)]
pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// Events as they are created
    async fn event_created(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = Event>> {
        let scope = request_context(ctx)?.clone();
        let stream = scope.pubsub.stream();
        Ok(stream.filter_map(move |notification| {
            let scope = scope.clone();
            async move {
                match notification {
                    Notification::EventCreated(event) => {
                        Some(Event::with_loaders(event, scope.fresh_loaders()))
                    }
                    _ => None,
                }
            }
        }))
    }

    /// Events as they are edited
    async fn event_updated(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = Event>> {
        let scope = request_context(ctx)?.clone();
        let stream = scope.pubsub.stream();
        Ok(stream.filter_map(move |notification| {
            let scope = scope.clone();
            async move {
                match notification {
                    Notification::EventUpdated(event) => {
                        Some(Event::with_loaders(event, scope.fresh_loaders()))
                    }
                    _ => None,
                }
            }
        }))
    }

    /// Ids of deleted events
    async fn event_deleted(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = ID>> {
        let stream = request_context(ctx)?.pubsub.stream();
        Ok(stream.filter_map(|notification| async move {
            match notification {
                Notification::EventDeleted(id) => Some(ID::from(id.to_string())),
                _ => None,
            }
        }))
    }

    /// Attendance changes for one event
    async fn attendance_changed(
        &self,
        ctx: &Context<'_>,
        event_id: ID,
    ) -> Result<impl Stream<Item = AttendanceChange>> {
        let event_id = parse_id(&event_id).into_gql()?;
        let scope = request_context(ctx)?.clone();
        let stream = scope.pubsub.stream();
        Ok(stream.filter_map(move |notification| {
            let scope = scope.clone();
            async move {
                match notification {
                    Notification::AttendanceChanged {
                        event,
                        user_id,
                        attending,
                    } if event.id == event_id => Some(AttendanceChange {
                        event: Event::with_loaders(event, scope.fresh_loaders()),
                        user_id: ID::from(user_id.to_string()),
                        attending,
                    }),
                    _ => None,
                }
            }
        }))
    }
}
