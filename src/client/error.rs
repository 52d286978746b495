//! Inter-service client errors.

use reqwest::StatusCode;
use thiserror::Error;

use crate::registry::RegistryError;

/// Errors that can occur during an inter-service call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The target service name could not be resolved.
    #[error(transparent)]
    Resolve(#[from] RegistryError),

    /// The path template could not be expanded.
    #[error("path template '{template}': {reason}")]
    Template { template: String, reason: String },

    /// Connection, I/O, or timeout failure reaching the upstream.
    #[error("{service} unavailable: {source}")]
    Unavailable {
        service: String,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with a non-success status.
    #[error("{service} returned {status}: {body}")]
    Status {
        service: String,
        status: StatusCode,
        body: String,
    },

    /// The response body did not match the expected payload shape.
    #[error("{service} returned an unexpected body: {source}")]
    Decode {
        service: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Status code returned by the upstream, if it answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// True when the upstream did not answer before the deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Unavailable { source, .. } if source.is_timeout())
    }
}

/// Result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
