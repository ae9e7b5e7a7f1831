//! Eventhub API library
//!
//! This module exposes the core API components for use in integration tests
//! and as a library.

pub mod config;
pub mod context;
pub mod error;
pub mod graphql;
pub mod models;
pub mod pubsub;
pub mod repositories;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use context::RequestContext;
pub use error::{ApiError, ApiResult};
pub use pubsub::EventPubSub;
pub use services::{AuthConfig, AuthService};
