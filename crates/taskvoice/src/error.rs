use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::PipelineError;
use crate::remote::RemoteError;
use crate::secrets::SecretError;

#[derive(Error, Debug)]
pub enum TaskVoiceError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Secret error: {0}")]
    Secret(#[from] SecretError),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Failed to read intent request '{path}': {source}")]
    ReadRequest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse intent request: {0}")]
    ParseRequest(#[source] serde_json::Error),

    #[error("Failed to render response: {0}")]
    RenderResponse(#[source] serde_json::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Invalid value for environment variable '{name}': {reason}")]
    InvalidEnvVar { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, TaskVoiceError>;
