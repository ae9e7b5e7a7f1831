//! Authentication mutations for Eventhub GraphQL API
//!
//! - register: Create an account and receive a token
//! - login: Exchange email and password for a token

use async_graphql::{Context, InputObject, Object, Result};

use crate::graphql::types::{AuthPayload, User};
use crate::graphql::GraphQLResultExt;
use crate::services::AuthService;

/// Input for user registration
#[derive(Debug, InputObject)]
pub struct RegisterInput {
    /// Display name
    pub name: String,
    /// Email address (must be unique)
    pub email: String,
    /// Password (minimum 6 characters)
    pub password: String,
}

/// Input for user login
#[derive(Debug, InputObject)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Default)]
pub struct AuthMutation;

#[Object]
impl AuthMutation {
    /// Create a new account
    async fn register(&self, ctx: &Context<'_>, input: RegisterInput) -> Result<AuthPayload> {
        let auth = ctx.data::<AuthService>()?;
        let (user, token) = auth
            .register(&input.name, &input.email, &input.password)
            .await
            .into_gql()?;
        Ok(AuthPayload {
            token,
            user: User::from(user),
        })
    }

    /// Sign in with email and password
    async fn login(&self, ctx: &Context<'_>, input: LoginInput) -> Result<AuthPayload> {
        let auth = ctx.data::<AuthService>()?;
        let (user, token) = auth
            .login(&input.email, &input.password)
            .await
            .into_gql()?;
        Ok(AuthPayload {
            token,
            user: User::from(user),
        })
    }
}
