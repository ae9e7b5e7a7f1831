//! HTTP route handlers for the Eventhub API
//!
//! - GraphQL endpoint, playground and subscription socket

pub mod graphql;

pub use graphql::{graphql_router, GraphQLState};
