//! Opt-in identity cache.
//!
//! Identity is resolved on every request unless a TTL is configured. When it
//! is, lookups are cached per credential fingerprint, so one user's identity
//! can never answer for another credential. Failed lookups are not cached.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::sync::Cache;
use tracing::debug;

use super::error::RemoteError;
use super::types::{Project, Task, TaskOptions, User};
use super::RemoteClient;

const MAX_CACHED_IDENTITIES: u64 = 10_000;

/// Shared TTL cache of `current_user` results keyed by credential
/// fingerprint. Cloning shares the underlying storage.
#[derive(Clone)]
pub struct IdentityCache {
    users: Cache<String, User>,
}

impl IdentityCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            users: Cache::builder()
                .max_capacity(MAX_CACHED_IDENTITIES)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub fn get(&self, key: &str) -> Option<User> {
        self.users.get(key)
    }

    pub fn insert(&self, key: String, user: User) {
        self.users.insert(key, user);
    }

    pub fn invalidate(&self, key: &str) {
        self.users.invalidate(key);
    }
}

/// Wraps a client so `current_user` consults the shared cache first.
pub struct CachedIdentityClient {
    inner: Arc<dyn RemoteClient>,
    cache: IdentityCache,
    key: String,
}

impl CachedIdentityClient {
    pub fn new(inner: Arc<dyn RemoteClient>, cache: IdentityCache, key: String) -> Self {
        Self { inner, cache, key }
    }
}

#[async_trait]
impl RemoteClient for CachedIdentityClient {
    async fn current_user(&self) -> Result<User, RemoteError> {
        if let Some(user) = self.cache.get(&self.key) {
            debug!(credential = %self.key, "Identity cache hit");
            return Ok(user);
        }

        match self.inner.current_user().await {
            Ok(user) => {
                self.cache.insert(self.key.clone(), user.clone());
                Ok(user)
            }
            Err(e) => {
                self.cache.invalidate(&self.key);
                Err(e)
            }
        }
    }

    async fn find_project_by_name(
        &self,
        workspace_id: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Project>, RemoteError> {
        self.inner
            .find_project_by_name(workspace_id, query, limit)
            .await
    }

    async fn create_task(
        &self,
        workspace_id: &str,
        options: &TaskOptions,
    ) -> Result<Task, RemoteError> {
        self.inner.create_task(workspace_id, options).await
    }

    async fn attach_project_to_task(
        &self,
        task_id: &str,
        project_id: &str,
    ) -> Result<(), RemoteError> {
        self.inner.attach_project_to_task(task_id, project_id).await
    }
}
