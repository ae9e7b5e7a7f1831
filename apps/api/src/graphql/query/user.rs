//! User queries

use async_graphql::{Context, Object, Result, ID};

use crate::graphql::guards::AuthGuard;
use crate::graphql::types::User;
use crate::graphql::{parse_id, request_context, GraphQLResultExt};

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// The signed-in user
    #[graphql(guard = "AuthGuard")]
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let scope = request_context(ctx)?;
        let caller = scope.require_caller().into_gql()?;
        let user = scope.loaders.user(caller.id).await.into_gql()?;
        Ok(user.map(User::from))
    }

    /// Look up a user by id; null if no such user
    async fn user(&self, ctx: &Context<'_>, id: ID) -> Result<Option<User>> {
        let id = parse_id(&id).into_gql()?;
        let scope = request_context(ctx)?;
        let user = scope.loaders.user(id).await.into_gql()?;
        Ok(user.map(User::from))
    }
}
