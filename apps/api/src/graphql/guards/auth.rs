//! Authentication gate for resolvers

use std::future::Future;

use async_graphql::{Context, ErrorExtensions, Guard};
use futures_util::future::{ready, Either, Ready};

use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};

/// Wrap `resolver` so it only runs for an authenticated caller
///
/// Without a caller the returned function fails with
/// [`ApiError::AuthenticationRequired`] and `resolver` is never invoked.
/// Otherwise the context and arguments are forwarded unchanged and the
/// resolver's result is returned as-is. Each call produces an independent
/// wrapper holding nothing but `resolver`.
pub fn require_auth<A, T, F, Fut>(
    resolver: F,
) -> impl Fn(RequestContext, A) -> Either<Ready<ApiResult<T>>, Fut> + Clone
where
    F: Fn(RequestContext, A) -> Fut + Clone,
    Fut: Future<Output = ApiResult<T>>,
{
    move |scope: RequestContext, args: A| {
        if scope.caller.is_none() {
            return Either::Left(ready(Err(ApiError::AuthenticationRequired)));
        }
        Either::Right(resolver(scope, args))
    }
}

/// Field guard rejecting anonymous callers
#[derive(Debug, Default, Clone, Copy)]
pub struct AuthGuard;

impl Guard for AuthGuard {
    async fn check(&self, ctx: &Context<'_>) -> async_graphql::Result<()> {
        let authenticated = ctx
            .data_opt::<RequestContext>()
            .is_some_and(RequestContext::is_authenticated);
        if authenticated {
            Ok(())
        } else {
            Err(ApiError::AuthenticationRequired.extend())
        }
    }
}
