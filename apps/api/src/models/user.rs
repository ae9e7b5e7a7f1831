//! User and authentication models for Eventhub
//!
//! This module contains the database models for:
//! - User accounts
//! - JWT claims and the caller identity derived from them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Issuer embedded in (and required of) every access token
pub const TOKEN_ISSUER: &str = "eventhub";

/// User account from the users table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address, stored lowercased (unique)
    pub email: String,

    /// Argon2 hashed password
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last profile update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Data required to insert a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: Uuid,

    /// User's email
    pub email: String,

    /// Issued at timestamp (Unix epoch)
    pub iat: i64,

    /// Expiration timestamp (Unix epoch)
    pub exp: i64,

    /// Issuer
    #[serde(default = "default_issuer")]
    pub iss: String,
}

fn default_issuer() -> String {
    TOKEN_ISSUER.to_string()
}

impl Claims {
    /// Create claims for `caller`, issued at `now` and valid for `ttl_secs`
    pub fn new(caller: &Caller, now: i64, ttl_secs: i64) -> Self {
        Self {
            sub: caller.id,
            email: caller.email.clone(),
            iat: now,
            exp: now + ttl_secs,
            iss: default_issuer(),
        }
    }
}

/// Authenticated caller identity attached to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    pub email: String,
}

impl From<Claims> for Caller {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
        }
    }
}

impl From<&User> for Caller {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
        }
    }
}
