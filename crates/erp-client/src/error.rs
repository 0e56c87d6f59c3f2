//! Error types for the REST client

use erp_records::RecordError;
use thiserror::Error;

/// Result type alias for client calls
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors raised while talking to the ERP API
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection or protocol failure
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The request did not finish in time
    #[error("Request timed out: {url}")]
    Timeout {
        /// Requested URL
        url: String,
    },

    /// Non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Status {
        /// Status code
        status: u16,
        /// Server message, or the response body
        message: String,
    },

    /// `success: false` envelope
    #[error("Request rejected: {message}")]
    Envelope {
        /// Server message
        message: String,
    },

    /// Body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Missing or rejected bearer token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Base URL could not be parsed
    #[error("Invalid base URL '{url}'")]
    InvalidUrl {
        /// Rejected URL
        url: String,
    },
}

impl ClientError {
    /// Classify a reqwest failure for `url`
    pub fn from_reqwest(error: reqwest::Error, url: &str) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Transport(error)
        }
    }

    /// HTTP status of the failure, if the server answered
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Unauthorized(_) => Some(401),
            _ => None,
        }
    }

    /// Whether the server reported the resource missing
    pub const fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404))
    }
}

impl From<ClientError> for RecordError {
    fn from(error: ClientError) -> Self {
        Self::backend(error)
    }
}
