//! GraphQL type definitions for Eventhub
//!
//! This module contains the GraphQL object types that are exposed
//! through the API.

mod auth;
mod event;
mod page;
mod user;

pub use auth::{AttendanceChange, AuthPayload};
pub use event::Event;
pub use page::PaginatedEvents;
pub use user::User;
