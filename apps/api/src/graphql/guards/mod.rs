//! GraphQL guards for Eventhub API
//!
//! Authentication is enforced in two interchangeable ways:
//! - [`require_auth`] wraps a resolver function and refuses to call it
//!   without a caller
//! - [`AuthGuard`] does the same check as an async-graphql field guard

mod auth;

pub use auth::{require_auth, AuthGuard};
