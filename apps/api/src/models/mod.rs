//! Database models and types for Eventhub
//!
//! This module contains SQLx models for:
//! - Users and authentication
//! - Events and their attendance

pub mod event;
pub mod user;

pub use event::{Event, EventChanges, EventFilter, EventSort, NewEvent};
pub use user::{Caller, Claims, NewUser, User, TOKEN_ISSUER};
