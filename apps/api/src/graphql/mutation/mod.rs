//! GraphQL mutations for Eventhub
//!
//! This module contains all mutation resolvers, organized by domain.

mod auth;
mod event;

pub use auth::{AuthMutation, LoginInput, RegisterInput};
pub use event::{CreateEventInput, EventMutation, UpdateEventInput};

use async_graphql::MergedObject;

/// Root mutation type combining all mutation domains
#[derive(MergedObject, Default)]
pub struct Mutation(AuthMutation, EventMutation);
