//! Common test utilities for API integration tests
//!
//! Shared fixtures plus a store spy for observing how the GraphQL layer
//! talks to persistence.

#![allow(unused_imports)]

pub mod fixtures;
pub mod store;

pub use fixtures::*;
pub use store::*;
