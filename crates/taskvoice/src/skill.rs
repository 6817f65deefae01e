//! Intent routing for the voice skill.
//!
//! The skill host delivers one request at a time; each is answered with a
//! single [`SkillResponse`]. Only task creation touches the remote service.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, info_span, warn, Instrument};

use crate::config::SkillConfig;
use crate::error::TaskVoiceError;
use crate::pipeline::Pipeline;
use crate::remote::{
    AuthContext, ClientProvider, HttpClientProvider, RemoteClient, UnavailableClient,
};
use crate::response::SkillResponse;

pub const CREATE_TASK_INTENT: &str = "CreateTaskIntent";
pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";

pub const TASK_NAME_SLOT: &str = "TaskName";
pub const PROJECT_NAME_SLOT: &str = "ProjectName";

const HELP_TEXT: &str =
    "You can ask me to add a task, and optionally name the project it belongs in.";
const GOODBYE: &str = "Goodbye";
const UNKNOWN_INTENT: &str = "Sorry, I don't know how to do that.";

#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RequestKind {
    /// Skill opened without an intent.
    Launch,
    Intent {
        name: String,
        #[serde(default)]
        slots: HashMap<String, Option<String>>,
    },
    SessionEnded {
        #[serde(default)]
        reason: Option<String>,
    },
}

impl RequestKind {
    fn label(&self) -> &str {
        match self {
            RequestKind::Launch => "launch",
            RequestKind::Intent { name, .. } => name,
            RequestKind::SessionEnded { .. } => "session_ended",
        }
    }
}

/// One inbound request from the skill host.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    #[serde(flatten)]
    pub kind: RequestKind,
    /// Linked-account token, when the user has linked their account.
    #[serde(default)]
    pub access_token: Option<String>,
}

impl IntentRequest {
    pub fn launch() -> Self {
        Self {
            kind: RequestKind::Launch,
            access_token: None,
        }
    }

    pub fn intent(name: &str, slots: &[(&str, &str)]) -> Self {
        Self {
            kind: RequestKind::Intent {
                name: name.to_string(),
                slots: slots
                    .iter()
                    .map(|(k, v)| (k.to_string(), Some(v.to_string())))
                    .collect(),
            },
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn auth(&self) -> AuthContext {
        match &self.access_token {
            Some(token) => AuthContext::delegated(token.clone()),
            None => AuthContext::anonymous(),
        }
    }

    fn slot(&self, name: &str) -> Option<String> {
        match &self.kind {
            RequestKind::Intent { slots, .. } => slots.get(name).cloned().flatten(),
            _ => None,
        }
    }
}

impl fmt::Debug for IntentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentRequest")
            .field("kind", &self.kind.label())
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

pub struct Skill {
    pipeline: Pipeline,
    clients: Arc<dyn ClientProvider>,
}

impl Skill {
    pub fn new(pipeline: Pipeline, clients: Arc<dyn ClientProvider>) -> Self {
        Self { pipeline, clients }
    }

    /// Production wiring: HTTP client per request, pipeline from config.
    pub fn from_config(config: SkillConfig) -> Result<Self, TaskVoiceError> {
        let pipeline = Pipeline::from_config(&config);
        let clients = HttpClientProvider::new(config)?;
        Ok(Self::new(pipeline, Arc::new(clients)))
    }

    /// Creates a task and answers with a confirmation or a spoken error.
    ///
    /// A client that cannot be built (no usable credential) still goes
    /// through the pipeline, so a missing task name is reported first.
    pub async fn create_task(
        &self,
        task_name: Option<String>,
        project_name: Option<String>,
        auth: &AuthContext,
    ) -> SkillResponse {
        let client: Arc<dyn RemoteClient> = match self.clients.client_for(auth) {
            Ok(client) => client,
            Err(e) => {
                warn!(category = e.kind.as_str(), "Could not build Asana client: {}", e);
                Arc::new(UnavailableClient::new(e))
            }
        };

        match self
            .pipeline
            .create_task(client, task_name, project_name)
            .await
        {
            Ok(view) => view.into(),
            Err(error) => error.into(),
        }
    }

    pub async fn handle(&self, request: IntentRequest) -> SkillResponse {
        let span = info_span!("request", kind = %request.kind.label());
        self.dispatch(request).instrument(span).await
    }

    async fn dispatch(&self, request: IntentRequest) -> SkillResponse {
        match &request.kind {
            RequestKind::Launch => {
                info!("Launch without intent; treating as task creation");
                self.create_task(None, None, &request.auth()).await
            }
            RequestKind::Intent { name, .. } => match name.as_str() {
                CREATE_TASK_INTENT => {
                    self.create_task(
                        request.slot(TASK_NAME_SLOT),
                        request.slot(PROJECT_NAME_SLOT),
                        &request.auth(),
                    )
                    .await
                }
                HELP_INTENT => SkillResponse::ask(HELP_TEXT, HELP_TEXT),
                STOP_INTENT | CANCEL_INTENT => SkillResponse::tell(GOODBYE),
                other => {
                    warn!(intent = other, "Unknown intent");
                    SkillResponse::tell(UNKNOWN_INTENT)
                }
            },
            RequestKind::SessionEnded { reason } => {
                info!(reason = reason.as_deref().unwrap_or("unspecified"), "Session ended");
                SkillResponse::tell("")
            }
        }
    }
}
