//! GraphQL HTTP and WebSocket handlers
//!
//! - `GET /graphql` - GraphQL Playground
//! - `POST /graphql` - query and mutation execution
//! - `GET /graphql/ws` - subscriptions over graphql-ws / graphql-transport-ws
//!
//! Every operation gets a fresh [`RequestContext`] so loader caches never
//! outlive the request that filled them.

use std::sync::Arc;

use async_graphql::http::{GraphQLPlaygroundConfig, ALL_WEBSOCKET_PROTOCOLS};
use async_graphql::Data;
use async_graphql_axum::{GraphQLProtocol, GraphQLRequest, GraphQLResponse, GraphQLWebSocket};
use axum::{
    extract::{State, WebSocketUpgrade},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use crate::context::RequestContext;
use crate::graphql::EventhubSchema;
use crate::pubsub::EventPubSub;
use crate::repositories::Store;
use crate::services::AuthService;

/// Connection parameter keys checked, in order, for a subscription credential
const CONNECTION_CREDENTIAL_KEYS: [&str; 3] = ["Authorization", "authorization", "authToken"];

/// Shared state for the GraphQL routes
#[derive(Clone)]
pub struct GraphQLState {
    pub schema: EventhubSchema,
    pub auth: AuthService,
    pub store: Arc<dyn Store>,
    pub pubsub: EventPubSub,
}

impl GraphQLState {
    pub fn new(
        schema: EventhubSchema,
        auth: AuthService,
        store: Arc<dyn Store>,
        pubsub: EventPubSub,
    ) -> Self {
        Self {
            schema,
            auth,
            store,
            pubsub,
        }
    }

    fn request_context(&self, credential: Option<&str>) -> RequestContext {
        RequestContext::from_credential(
            credential,
            &self.auth,
            self.store.clone(),
            self.pubsub.clone(),
        )
    }
}

/// Create the GraphQL router
pub fn graphql_router(state: GraphQLState) -> Router {
    Router::new()
        .route("/graphql", get(graphql_playground).post(graphql_handler))
        .route("/graphql/ws", get(graphql_ws_handler))
        .with_state(state)
}

/// Execute a query or mutation
///
/// A missing or invalid `Authorization` header yields an anonymous context;
/// gated resolvers reject it individually.
async fn graphql_handler(
    State(state): State<GraphQLState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let credential = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let scope = state.request_context(credential);

    let request = req.into_inner().data(scope);
    state.schema.execute(request).await.into()
}

/// Upgrade to a GraphQL subscription socket
///
/// Identity is resolved once, from the `connection_init` payload, and the
/// resulting context lives as long as the connection.
async fn graphql_ws_handler(
    State(state): State<GraphQLState>,
    protocol: GraphQLProtocol,
    websocket: WebSocketUpgrade,
) -> Response {
    websocket
        .protocols(ALL_WEBSOCKET_PROTOCOLS)
        .on_upgrade(move |stream| {
            let schema = state.schema.clone();
            GraphQLWebSocket::new(stream, schema, protocol)
                .on_connection_init(move |params| async move {
                    let credential = connection_credential(&params);
                    let mut data = Data::default();
                    data.insert(state.request_context(credential.as_deref()));
                    Ok(data)
                })
                .serve()
        })
}

/// GraphQL Playground
async fn graphql_playground() -> impl IntoResponse {
    Html(async_graphql::http::playground_source(
        GraphQLPlaygroundConfig::new("/graphql").subscription_endpoint("/graphql/ws"),
    ))
}

fn connection_credential(params: &serde_json::Value) -> Option<String> {
    CONNECTION_CREDENTIAL_KEYS
        .iter()
        .find_map(|key| params.get(key).and_then(|value| value.as_str()))
        .map(str::to_string)
}
