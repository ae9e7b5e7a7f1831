//! Test fixtures for API integration tests
//!
//! [`TestApp`] wires the real schema, auth service and pub/sub over a
//! [`CountingStore`], so tests run without a database.

#![allow(dead_code)]

use std::sync::Arc;

use async_graphql::{Request, Response, Variables};
use chrono::NaiveDate;
use serde_json::Value;
use uuid::Uuid;

use eventhub_api::graphql::{build_schema, EventhubSchema};
use eventhub_api::models::{Caller, Event, NewEvent, User};
use eventhub_api::repositories::Store;
use eventhub_api::routes::GraphQLState;
use eventhub_api::{AuthConfig, AuthService, EventPubSub, RequestContext};

use super::store::CountingStore;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-chars";
pub const TEST_PASSWORD: &str = "correct horse";

pub struct TestApp {
    pub store: Arc<CountingStore>,
    pub auth: AuthService,
    pub pubsub: EventPubSub,
    pub schema: EventhubSchema,
}

impl TestApp {
    pub fn new() -> Self {
        let store = CountingStore::new();
        let dyn_store: Arc<dyn Store> = store.clone();
        let auth = AuthService::new(dyn_store.clone(), AuthConfig::new(TEST_JWT_SECRET))
            .expect("auth service");
        let schema = build_schema(dyn_store, auth.clone());
        Self {
            store,
            auth,
            pubsub: EventPubSub::new(),
            schema,
        }
    }

    pub fn dyn_store(&self) -> Arc<dyn Store> {
        self.store.clone()
    }

    pub fn state(&self) -> GraphQLState {
        GraphQLState::new(
            self.schema.clone(),
            self.auth.clone(),
            self.dyn_store(),
            self.pubsub.clone(),
        )
    }

    /// A fresh request context, authenticated when `user` is given
    pub fn scope(&self, user: Option<&User>) -> RequestContext {
        RequestContext::new(user.map(Caller::from), self.dyn_store(), self.pubsub.clone())
    }

    /// Register an account and return it with its token
    pub async fn register(&self, name: &str) -> (User, String) {
        let email = format!("{}@example.com", name.to_lowercase());
        self.auth
            .register(name, &email, TEST_PASSWORD)
            .await
            .expect("register")
    }

    /// Insert an event directly into the store
    pub async fn seed_event(&self, creator: &User, title: &str, day: u32) -> Event {
        self.store
            .inner()
            .insert_event(creator.id, new_event(title, day))
            .await
            .expect("seed event")
    }

    pub async fn seed_attendance(&self, event: &Event, user: &User) -> Event {
        self.store
            .inner()
            .add_attendee(event.id, user.id)
            .await
            .expect("attend")
            .expect("event exists")
    }

    /// Execute an operation as `user` (anonymous when `None`)
    pub async fn execute(&self, query: &str, variables: Value, user: Option<&User>) -> Response {
        let request = Request::new(query)
            .variables(Variables::from_json(variables))
            .data(self.scope(user));
        self.schema.execute(request).await
    }

    /// Execute and return `data` as JSON, panicking on errors
    pub async fn data(&self, query: &str, variables: Value, user: Option<&User>) -> Value {
        let response = self.execute(query, variables, user).await;
        assert!(
            response.errors.is_empty(),
            "unexpected errors: {:?}",
            response.errors
        );
        response.data.into_json().expect("json data")
    }
}

pub fn new_event(title: &str, day: u32) -> NewEvent {
    NewEvent {
        title: title.to_string(),
        description: format!("{title} description"),
        date: NaiveDate::from_ymd_opt(2025, 6, day).expect("valid day"),
        time: "18:30".to_string(),
        location: "Town Hall".to_string(),
        image_url: None,
    }
}

/// The `code` extension of the first error in `response`
pub fn error_code(response: &Response) -> Option<String> {
    let error = response.errors.first()?;
    let extensions = error.extensions.as_ref()?;
    match extensions.get("code")? {
        async_graphql::Value::String(code) => Some(code.clone()),
        _ => None,
    }
}

pub fn id_of(value: &Value) -> Uuid {
    value
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .expect("uuid string")
}
