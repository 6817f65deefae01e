pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod remote;
pub mod response;
pub mod sanitize;
pub mod secrets;
pub mod skill;
pub mod translate;

pub use config::{load_config, load_config_from_str, SkillConfig};
pub use error::{ConfigError, Result, TaskVoiceError};
pub use pipeline::{run_create_task_pipeline, Pipeline, PipelineContext, PipelineError};
pub use remote::{AsanaClient, RemoteClient, RemoteError, RemoteErrorKind};
pub use response::{ConfirmationView, SkillResponse, SpokenError};
pub use secrets::{resolve_secret, resolve_secret_optional, SecretError};
pub use skill::{IntentRequest, Skill};
