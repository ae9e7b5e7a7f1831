//! Business logic services for Eventhub
//!
//! This module contains the core business logic including:
//! - Authentication: registration, login, password hashing and tokens
//! - Event management: creation, updates, attendance and listings

pub mod auth;
pub mod event;

pub use auth::{AuthConfig, AuthService};
pub use event::{EventDraft, EventListing, EventService};
