use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Closed set of failure categories reported by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteErrorKind {
    InvalidRequest,
    NoAuthorization,
    Forbidden,
    NotFound,
    RateLimitEnforced,
    ServerError,
    /// Transport, decoding, and any status we do not recognise.
    Other,
}

impl RemoteErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::InvalidRequest,
            401 => Self::NoAuthorization,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            429 => Self::RateLimitEnforced,
            500..=599 => Self::ServerError,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::NoAuthorization => "no_authorization",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::RateLimitEnforced => "rate_limit_enforced",
            Self::ServerError => "server_error",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub message: String,
    /// HTTP status, when the failure came from a response.
    pub status: Option<u16>,
    /// Server-provided backoff hint on rate limiting.
    pub retry_after: Option<Duration>,
}

impl RemoteError {
    pub fn new(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            retry_after: None,
        }
    }

    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            ..Self::new(RemoteErrorKind::from_status(status), message)
        }
    }

    pub fn with_retry_after(mut self, retry_after: Option<Duration>) -> Self {
        self.retry_after = retry_after;
        self
    }

    pub fn no_authorization(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::NoAuthorization, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Other, message)
    }
}
