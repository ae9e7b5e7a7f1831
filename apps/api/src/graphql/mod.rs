//! GraphQL schema and resolvers for Eventhub
//!
//! This module contains the async-graphql schema including:
//! - Query, mutation and subscription resolvers
//! - Per-request DataLoaders for relationship fields
//! - Page/limit pagination for list queries
//! - Guards for authentication

pub mod guards;
pub mod loaders;
pub mod mutation;
pub mod pagination;
pub mod query;
pub mod schema;
pub mod subscription;
pub mod types;

pub use schema::{build_schema, EventhubSchema, SchemaBuilder};

use std::sync::Arc;

use async_graphql::{Context, ErrorExtensions, ID};
use uuid::Uuid;

use crate::context::RequestContext;
use crate::error::ApiError;
use loaders::Loaders;

/// Fetch the operation's [`RequestContext`]
pub(crate) fn request_context<'a>(
    ctx: &Context<'a>,
) -> async_graphql::Result<&'a RequestContext> {
    ctx.data::<RequestContext>()
}

/// Loaders for a relationship field: the object's own set when it carries
/// one, the operation's otherwise
pub(crate) fn loaders_for(
    ctx: &Context<'_>,
    own: Option<&Arc<Loaders>>,
) -> async_graphql::Result<Arc<Loaders>> {
    match own {
        Some(loaders) => Ok(loaders.clone()),
        None => Ok(request_context(ctx)?.loaders.clone()),
    }
}

/// Parse a client-supplied ID, rejecting anything that is not a UUID
///
/// Ids are checked here so loaders only ever batch well-formed keys.
pub(crate) fn parse_id(id: &ID) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id.as_str())
        .map_err(|_| ApiError::validation(format!("invalid id: {}", id.as_str())))
}

/// Convert domain errors into GraphQL errors with a `code` extension
pub(crate) trait GraphQLResultExt<T> {
    fn into_gql(self) -> async_graphql::Result<T>;
}

impl<T, E: Into<ApiError>> GraphQLResultExt<T> for Result<T, E> {
    fn into_gql(self) -> async_graphql::Result<T> {
        self.map_err(|e| {
            let err: ApiError = e.into();
            err.extend()
        })
    }
}
