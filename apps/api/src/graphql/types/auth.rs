//! Authentication and notification payloads

use async_graphql::{SimpleObject, ID};

use super::event::Event;
use super::user::User;

/// Result of a successful register or login
#[derive(SimpleObject)]
pub struct AuthPayload {
    /// Bearer token valid for one day
    pub token: String,
    pub user: User,
}

/// Someone started or stopped attending an event
#[derive(SimpleObject)]
pub struct AttendanceChange {
    pub event: Event,
    pub user_id: ID,
    /// True when the user joined, false when they cancelled
    pub attending: bool,
}
