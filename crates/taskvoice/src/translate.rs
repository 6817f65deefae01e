//! Failure → spoken sentence.

use crate::pipeline::PipelineError;
use crate::remote::RemoteErrorKind;

pub const ERROR_PREFIX: &str = "I wasn't able to create the task, ";
const GENERIC_FAILURE: &str = "a problem has occurred";

/// One sentence fragment for any pipeline failure.
pub fn translate(error: &PipelineError) -> String {
    match error {
        PipelineError::Domain(domain) => domain.to_string(),
        PipelineError::Remote(remote) => match remote.kind {
            RemoteErrorKind::InvalidRequest => "the request to Asana was invalid".to_string(),
            RemoteErrorKind::NoAuthorization => {
                "your Asana credentials are missing or expired".to_string()
            }
            RemoteErrorKind::Forbidden => "the request to Asana wasn't allowed".to_string(),
            RemoteErrorKind::NotFound => "the Asana resource wasn't found".to_string(),
            RemoteErrorKind::RateLimitEnforced => {
                "the request was rate limited by Asana, try again later".to_string()
            }
            RemoteErrorKind::ServerError => "the Asana server experienced an error".to_string(),
            RemoteErrorKind::Other => GENERIC_FAILURE.to_string(),
        },
        PipelineError::Unexpected(_) => GENERIC_FAILURE.to_string(),
    }
}

/// The full sentence spoken back to the user.
pub fn spoken_error(error: &PipelineError) -> String {
    format!("{}{}.", ERROR_PREFIX, translate(error))
}
