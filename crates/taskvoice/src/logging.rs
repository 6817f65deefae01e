//! Tracing subscriber setup for the CLI.
//!
//! Logs go to stderr so stdout stays reserved for the rendered response.

use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use crate::error::TaskVoiceError;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Installs the global subscriber. `RUST_LOG` overrides `level` when set.
///
/// Records emitted through the `log` facade by dependencies are bridged into
/// tracing. Calling this twice is an error.
pub fn init_logging(level: &str, json: bool) -> Result<(), TaskVoiceError> {
    tracing_log::LogTracer::init().map_err(|e| TaskVoiceError::Logging(e.to_string()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        tracing::subscriber::set_global_default(
            registry.with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            ),
        )
    } else {
        tracing::subscriber::set_global_default(
            registry.with(
                fmt::layer()
                    .with_target(false)
                    .compact()
                    .with_writer(std::io::stderr),
            ),
        )
    };

    result.map_err(|e| TaskVoiceError::Logging(e.to_string()))
}
