pub mod config;
pub mod context;
pub mod error;
pub mod resolve;
pub mod runner;

pub use config::PipelineConfig;
pub use context::PipelineContext;
pub use error::{DomainError, PipelineError};
pub use runner::{run_create_task_pipeline, Pipeline};
