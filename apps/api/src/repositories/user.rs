//! User repository for centralized database operations

use sqlx::PgPool;
use uuid::Uuid;

use super::utils::USER_COLUMNS;
use crate::models::{NewUser, User};

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find every user whose id is in `ids`
    ///
    /// Missing ids are simply absent from the result.
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, sqlx::Error> {
        let sql = format!("SELECT {} FROM users WHERE id = ANY($1)", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
    }

    /// Find a user by their email address
    ///
    /// # Arguments
    /// * `email` - The email address to search for (case-insensitive)
    ///
    /// # Returns
    /// * `Ok(Some(User))` - If the user exists
    /// * `Ok(None)` - If no user with the given email exists
    /// * `Err(sqlx::Error)` - If a database error occurs
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool)
            .await
    }

    /// Create a new user in the database
    ///
    /// Unique constraint violations on `email` surface as
    /// `sqlx::Error::Database`; the store adapter classifies them.
    pub async fn create(&self, user: &NewUser) -> Result<User, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.name)
            .bind(user.email.to_lowercase())
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await
    }
}
