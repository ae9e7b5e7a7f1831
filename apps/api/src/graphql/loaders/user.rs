//! User DataLoader for batched fetching
//!
//! Batches user id lookups (event creators, attendees, `user(id)`) into a
//! single store call.

use async_graphql::dataloader::Loader;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::User;
use crate::repositories::{Store, StoreError};

/// DataLoader for batching user queries
#[derive(Clone)]
pub struct UserLoader {
    store: Arc<dyn Store>,
}

impl UserLoader {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

impl Loader<Uuid> for UserLoader {
    type Value = Option<User>;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let users = self.store.find_users_by_ids(keys).await.map_err(Arc::new)?;

        let mut result: HashMap<Uuid, Option<User>> = keys.iter().map(|k| (*k, None)).collect();
        for user in users {
            result.insert(user.id, Some(user));
        }
        Ok(result)
    }
}
