use thiserror::Error;

use crate::remote::RemoteError;

/// Preconditions checked locally, before or between remote calls.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Cannot create a task without a name")]
    MissingTaskName,

    #[error("Cannot create a task without a workspace ID")]
    MissingWorkspace,

    #[error("Cannot create a task without a user or project ID")]
    MissingAssignee,

    #[error("Cannot add a project to a task without a task")]
    MissingCreatedTask,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Anything that escaped classification, including panics in a stage.
    #[error("Unexpected failure: {0}")]
    Unexpected(String),
}

impl PipelineError {
    /// Short label for logs and span fields.
    pub fn category(&self) -> &'static str {
        match self {
            PipelineError::Domain(_) => "domain",
            PipelineError::Remote(e) => e.kind.as_str(),
            PipelineError::Unexpected(_) => "unexpected",
        }
    }
}
