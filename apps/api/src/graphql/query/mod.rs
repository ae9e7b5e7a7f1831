//! GraphQL queries for Eventhub
//!
//! This module contains all query resolvers, organized by domain.

mod event;
mod user;

pub use event::{EventFilterInput, EventQuery, EventSortInput};
pub use user::UserQuery;

use async_graphql::MergedObject;

/// Root query type combining all query domains
#[derive(MergedObject, Default)]
pub struct Query(UserQuery, EventQuery);
