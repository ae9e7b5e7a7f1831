//! GraphQL schema builder for Eventhub
//!
//! The schema holds only long-lived services. Per-operation state (caller,
//! loaders, pub/sub handle) arrives as a [`crate::context::RequestContext`]
//! attached to each request.

use std::sync::Arc;

use async_graphql::Schema;

use crate::error::{ApiError, ApiResult};
use crate::repositories::Store;
use crate::services::{AuthService, EventService};

use super::mutation::Mutation;
use super::query::Query;
use super::subscription::SubscriptionRoot;

/// Maximum query nesting depth
pub const MAX_QUERY_DEPTH: usize = 10;

/// Maximum query complexity
pub const MAX_QUERY_COMPLEXITY: usize = 1000;

/// The Eventhub GraphQL schema type
pub type EventhubSchema = Schema<Query, Mutation, SubscriptionRoot>;

/// Builder for constructing the GraphQL schema with required services
#[derive(Default)]
pub struct SchemaBuilder {
    store: Option<Arc<dyn Store>>,
    auth_service: Option<AuthService>,
}

impl SchemaBuilder {
    /// Create a new schema builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the persistence store
    pub fn store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the auth service
    pub fn auth_service(mut self, auth_service: AuthService) -> Self {
        self.auth_service = Some(auth_service);
        self
    }

    /// Build the schema with all configured services
    ///
    /// # Errors
    /// `ApiError::Configuration` if the store or auth service is missing
    pub fn build(self) -> ApiResult<EventhubSchema> {
        let store = self
            .store
            .ok_or_else(|| ApiError::Configuration("store is required".to_string()))?;
        let auth_service = self
            .auth_service
            .ok_or_else(|| ApiError::Configuration("auth service is required".to_string()))?;

        Ok(build_schema(store, auth_service))
    }
}

/// Create a new GraphQL schema with the provided services
pub fn build_schema(store: Arc<dyn Store>, auth_service: AuthService) -> EventhubSchema {
    Schema::build(Query::default(), Mutation::default(), SubscriptionRoot)
        .data(EventService::new(store))
        .data(auth_service)
        .limit_depth(MAX_QUERY_DEPTH)
        .limit_complexity(MAX_QUERY_COMPLEXITY)
        .finish()
}
