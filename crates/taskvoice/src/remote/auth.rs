//! Credential selection and client construction.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::config::SkillConfig;
use crate::error::TaskVoiceError;
use crate::sanitize;

use super::cache::{CachedIdentityClient, IdentityCache};
use super::error::RemoteError;
use super::http::AsanaClient;
use super::types::{Project, Task, TaskOptions, User};
use super::RemoteClient;

/// Per-request authentication handed over by the skill host.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    /// Delegated token from account linking, when the user has linked.
    pub access_token: Option<SecretString>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn delegated(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(SecretString::from(token.into())),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Credential {
    /// The user's own linked-account token.
    Delegated(SecretString),
    /// The statically configured service token.
    Service(SecretString),
}

impl Credential {
    /// Picks the delegated token when present, otherwise the service token.
    pub fn resolve(
        auth: &AuthContext,
        service_token: Option<&SecretString>,
    ) -> Result<Self, RemoteError> {
        if let Some(token) = auth
            .access_token
            .as_ref()
            .filter(|t| !t.expose_secret().trim().is_empty())
        {
            return Ok(Credential::Delegated(token.clone()));
        }

        match service_token {
            Some(token) => Ok(Credential::Service(token.clone())),
            None => Err(RemoteError::no_authorization(
                "No linked account token and no service token configured",
            )),
        }
    }

    pub fn secret(&self) -> &SecretString {
        match self {
            Credential::Delegated(token) | Credential::Service(token) => token,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Credential::Delegated(_) => "delegated",
            Credential::Service(_) => "service",
        }
    }

    pub fn fingerprint(&self) -> String {
        sanitize::fingerprint_secret(self.secret())
    }
}

/// Builds the remote client for one request.
pub trait ClientProvider: Send + Sync {
    fn client_for(&self, auth: &AuthContext) -> Result<Arc<dyn RemoteClient>, RemoteError>;
}

/// Production provider backed by [`AsanaClient`].
pub struct HttpClientProvider {
    config: SkillConfig,
    service_token: Option<SecretString>,
    identity_cache: Option<IdentityCache>,
}

impl HttpClientProvider {
    /// Resolves the service token up front so a broken secret source fails
    /// at startup rather than on the first request.
    pub fn new(config: SkillConfig) -> Result<Self, TaskVoiceError> {
        let service_token = config.service_token()?;
        let identity_cache = config.identity_cache_ttl().map(IdentityCache::new);
        Ok(Self {
            config,
            service_token,
            identity_cache,
        })
    }

    pub fn with_service_token(config: SkillConfig, service_token: Option<SecretString>) -> Self {
        let identity_cache = config.identity_cache_ttl().map(IdentityCache::new);
        Self {
            config,
            service_token,
            identity_cache,
        }
    }

    pub fn config(&self) -> &SkillConfig {
        &self.config
    }
}

impl ClientProvider for HttpClientProvider {
    fn client_for(&self, auth: &AuthContext) -> Result<Arc<dyn RemoteClient>, RemoteError> {
        let credential = Credential::resolve(auth, self.service_token.as_ref())?;
        let fingerprint = credential.fingerprint();
        debug!(
            credential = credential.kind(),
            fingerprint = %fingerprint,
            "Building Asana client"
        );

        let client: Arc<dyn RemoteClient> = Arc::new(AsanaClient::from_config(
            &self.config,
            credential.secret().clone(),
        )?);

        Ok(match &self.identity_cache {
            Some(cache) => Arc::new(CachedIdentityClient::new(client, cache.clone(), fingerprint)),
            None => client,
        })
    }
}

/// Hands out the same client for every request, regardless of credentials.
pub struct StaticClientProvider {
    client: Arc<dyn RemoteClient>,
}

impl StaticClientProvider {
    pub fn new(client: Arc<dyn RemoteClient>) -> Self {
        Self { client }
    }
}

impl ClientProvider for StaticClientProvider {
    fn client_for(&self, _auth: &AuthContext) -> Result<Arc<dyn RemoteClient>, RemoteError> {
        Ok(self.client.clone())
    }
}

/// Stands in for a client that could not be built; every call fails with
/// the construction error.
pub struct UnavailableClient {
    error: RemoteError,
}

impl UnavailableClient {
    pub fn new(error: RemoteError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl RemoteClient for UnavailableClient {
    async fn current_user(&self) -> Result<User, RemoteError> {
        Err(self.error.clone())
    }

    async fn find_project_by_name(
        &self,
        _workspace_id: &str,
        _query: &str,
        _limit: u32,
    ) -> Result<Vec<Project>, RemoteError> {
        Err(self.error.clone())
    }

    async fn create_task(
        &self,
        _workspace_id: &str,
        _options: &TaskOptions,
    ) -> Result<Task, RemoteError> {
        Err(self.error.clone())
    }

    async fn attach_project_to_task(
        &self,
        _task_id: &str,
        _project_id: &str,
    ) -> Result<(), RemoteError> {
        Err(self.error.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::RemoteErrorKind;

    #[tokio::test]
    async fn test_unavailable_client_fails_every_call() {
        let client = UnavailableClient::new(RemoteError::no_authorization("no token"));
        let err = client.current_user().await.unwrap_err();
        assert_eq!(err.kind, RemoteErrorKind::NoAuthorization);
        assert!(client.attach_project_to_task("T1", "P1").await.is_err());
    }

    #[test]
    fn test_delegated_token_preferred() {
        let auth = AuthContext::delegated("user-token");
        let service = SecretString::from("service-token");

        let credential = Credential::resolve(&auth, Some(&service)).unwrap();
        assert_eq!(credential.kind(), "delegated");
        assert_eq!(credential.secret().expose_secret(), "user-token");
    }

    #[test]
    fn test_blank_delegated_token_falls_back() {
        let auth = AuthContext::delegated("   ");
        let service = SecretString::from("service-token");

        let credential = Credential::resolve(&auth, Some(&service)).unwrap();
        assert_eq!(credential.kind(), "service");
    }

    #[test]
    fn test_no_credentials_is_no_authorization() {
        let err = Credential::resolve(&AuthContext::anonymous(), None).unwrap_err();
        assert_eq!(err.kind, RemoteErrorKind::NoAuthorization);
    }

    #[test]
    fn test_provider_builds_client_with_service_token() {
        let provider = HttpClientProvider::with_service_token(
            SkillConfig::default(),
            Some(SecretString::from("service-token")),
        );
        assert!(provider.client_for(&AuthContext::anonymous()).is_ok());
    }

    #[test]
    fn test_provider_without_any_token() {
        let provider = HttpClientProvider::with_service_token(SkillConfig::default(), None);
        let err = provider
            .client_for(&AuthContext::anonymous())
            .err()
            .unwrap();
        assert_eq!(err.kind, RemoteErrorKind::NoAuthorization);
    }

    #[test]
    fn test_debug_output_hides_tokens() {
        let auth = AuthContext::delegated("super-secret-token");
        assert!(!format!("{:?}", auth).contains("super-secret-token"));
    }
}
