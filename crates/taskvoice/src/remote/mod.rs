//! The remote task-tracking service, seen through a small async capability.
//!
//! The pipeline only ever talks to [`RemoteClient`]. [`AsanaClient`] is the
//! HTTP implementation; [`MemoryClient`] backs dry runs and tests.

pub mod auth;
pub mod cache;
pub mod error;
pub mod http;
pub mod memory;
pub mod types;

use async_trait::async_trait;

pub use auth::{
    AuthContext, ClientProvider, Credential, HttpClientProvider, StaticClientProvider,
    UnavailableClient,
};
pub use cache::{CachedIdentityClient, IdentityCache};
pub use error::{RemoteError, RemoteErrorKind};
pub use http::AsanaClient;
pub use memory::{Call, MemoryClient, Operation};
pub use types::{Project, Task, TaskOptions, User, UserRef, Workspace};

#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// The user the credential belongs to, with their workspaces.
    async fn current_user(&self) -> Result<User, RemoteError>;

    /// Typeahead search for projects in a workspace, best match first.
    /// At most `limit` results are requested.
    async fn find_project_by_name(
        &self,
        workspace_id: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Project>, RemoteError>;

    async fn create_task(
        &self,
        workspace_id: &str,
        options: &TaskOptions,
    ) -> Result<Task, RemoteError>;

    async fn attach_project_to_task(
        &self,
        task_id: &str,
        project_id: &str,
    ) -> Result<(), RemoteError>;
}
