//! Asana REST client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT, RETRY_AFTER};
use reqwest::{Client, RequestBuilder, Response, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::SkillConfig;
use crate::sanitize::{self, MAX_ERROR_BODY_LENGTH};

use super::error::RemoteError;
use super::types::{DataEnvelope, ErrorEnvelope, Project, Task, TaskOptions, User};
use super::RemoteClient;

const USER_FIELDS: &str = "name,email,workspaces,workspaces.name";
const TASK_FIELDS: &str = "name,assignee,workspace,workspace.name,created_at,permalink_url";

pub struct AsanaClient {
    http: Client,
    base_url: Url,
    token: SecretString,
}

impl AsanaClient {
    pub fn new(
        base_url: &str,
        token: SecretString,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RemoteError::other(format!("Invalid API base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::other("API base URL cannot carry a path"));
        }

        let http = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .user_agent(concat!("taskvoice/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RemoteError::other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    pub fn from_config(config: &SkillConfig, token: SecretString) -> Result<Self, RemoteError> {
        Self::new(
            &config.api_base_url,
            token,
            config.connect_timeout(),
            config.request_timeout(),
        )
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::other("API base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        operation: &'static str,
    ) -> Result<Response, RemoteError> {
        let response = request
            .bearer_auth(self.token.expose_secret())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    "timed out".to_string()
                } else {
                    e.to_string()
                };
                warn!(operation, "Asana request failed: {}", reason);
                RemoteError::other(format!("{} request failed: {}", operation, reason))
            })?;

        let status = response.status();
        debug!(operation, status = status.as_u16(), "Asana responded");

        if status.is_success() {
            return Ok(response);
        }

        let retry_after = parse_retry_after(response.headers());
        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(&body)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| "no details".to_string());

        warn!(
            operation,
            status = status.as_u16(),
            "Asana returned an error: {}",
            detail
        );

        Err(RemoteError::from_status(
            status.as_u16(),
            format!("{} failed ({}): {}", operation, status.as_u16(), detail),
        )
        .with_retry_after(retry_after))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &'static str,
    ) -> Result<T, RemoteError> {
        let response = self.execute(request, operation).await?;
        let envelope: DataEnvelope<T> = response.json().await.map_err(|e| {
            RemoteError::other(format!("Failed to parse {} response: {}", operation, e))
        })?;
        Ok(envelope.data)
    }
}

/// Joins the `errors[].message` entries of an Asana error body.
fn error_detail(body: &str) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
    let messages: Vec<&str> = envelope
        .errors
        .iter()
        .map(|e| e.message.as_str())
        .filter(|m| !m.is_empty())
        .collect();
    if messages.is_empty() {
        return None;
    }
    Some(sanitize::truncate_body(
        &messages.join("; "),
        MAX_ERROR_BODY_LENGTH,
    ))
}

/// `Retry-After` in delta-seconds form. HTTP-date values are ignored.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[async_trait]
impl RemoteClient for AsanaClient {
    async fn current_user(&self) -> Result<User, RemoteError> {
        let url = self.endpoint(&["users", "me"])?;
        let request = self.http.get(url).query(&[("opt_fields", USER_FIELDS)]);
        self.send(request, "current_user").await
    }

    async fn find_project_by_name(
        &self,
        workspace_id: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Project>, RemoteError> {
        let url = self.endpoint(&["workspaces", workspace_id, "typeahead"])?;
        let count = limit.to_string();
        let request = self.http.get(url).query(&[
            ("resource_type", "project"),
            ("query", query),
            ("count", count.as_str()),
        ]);
        self.send(request, "find_project_by_name").await
    }

    async fn create_task(
        &self,
        workspace_id: &str,
        options: &TaskOptions,
    ) -> Result<Task, RemoteError> {
        let url = self.endpoint(&["workspaces", workspace_id, "tasks"])?;
        let request = self
            .http
            .post(url)
            .query(&[("opt_fields", TASK_FIELDS)])
            .json(&DataEnvelope { data: options });
        self.send(request, "create_task").await
    }

    async fn attach_project_to_task(
        &self,
        task_id: &str,
        project_id: &str,
    ) -> Result<(), RemoteError> {
        let url = self.endpoint(&["tasks", task_id, "addProject"])?;
        let body = DataEnvelope {
            data: serde_json::json!({ "project": project_id }),
        };
        let request = self.http.post(url).json(&body);
        self.execute(request, "attach_project_to_task").await?;
        Ok(())
    }
}
