//! Per-operation request context
//!
//! A [`RequestContext`] is built at the transport boundary for every GraphQL
//! operation (HTTP) or connection (WebSocket) and handed to the executor as
//! request data. Its loaders start empty, so nothing cached while serving one
//! request can be observed by another. Subscriptions resolve each pushed item
//! with [`RequestContext::fresh_loaders`] instead of the connection's set.

use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::graphql::loaders::Loaders;
use crate::models::Caller;
use crate::pubsub::EventPubSub;
use crate::repositories::Store;
use crate::services::{AuthService, EventService};

#[derive(Clone)]
pub struct RequestContext {
    /// Identity from a verified token, if any
    pub caller: Option<Caller>,
    pub loaders: Arc<Loaders>,
    pub pubsub: EventPubSub,
    store: Arc<dyn Store>,
}

impl RequestContext {
    /// Fresh context with new, empty loaders
    pub fn new(caller: Option<Caller>, store: Arc<dyn Store>, pubsub: EventPubSub) -> Self {
        Self {
            caller,
            loaders: Arc::new(Loaders::new(store.clone())),
            pubsub,
            store,
        }
    }

    /// Build a context from a raw credential such as an `Authorization` header
    ///
    /// Invalid or missing credentials produce an anonymous context.
    pub fn from_credential(
        credential: Option<&str>,
        auth: &AuthService,
        store: Arc<dyn Store>,
        pubsub: EventPubSub,
    ) -> Self {
        let caller = credential.and_then(|raw| auth.verify_token(raw));
        Self::new(caller, store, pubsub)
    }

    /// The authenticated caller, or `AuthenticationRequired`
    pub fn require_caller(&self) -> ApiResult<&Caller> {
        self.caller.as_ref().ok_or(ApiError::AuthenticationRequired)
    }

    pub fn is_authenticated(&self) -> bool {
        self.caller.is_some()
    }

    /// A new, empty loader set over the same store
    pub fn fresh_loaders(&self) -> Arc<Loaders> {
        Arc::new(Loaders::new(self.store.clone()))
    }

    /// Event operations over this context's store
    pub fn events(&self) -> EventService {
        EventService::new(self.store.clone())
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("caller", &self.caller)
            .finish_non_exhaustive()
    }
}
