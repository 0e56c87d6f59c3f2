//! Error types for record pages

use erp_core::RecordId;
use thiserror::Error;

/// Boxed error produced by a repository backend
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for record operations
pub type RecordResult<T> = Result<T, RecordError>;

/// Errors raised by the record engine and its repositories
#[derive(Error, Debug)]
pub enum RecordError {
    /// No record with the given id
    #[error("{resource} record {id} not found")]
    NotFound {
        /// Collection name
        resource: &'static str,
        /// Requested id
        id: RecordId,
    },

    /// Status change rejected by the transition table
    #[error("Status transition not allowed: {from} -> {to}")]
    InvalidTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// Required field missing or out of range
    #[error("Validation failed for: {fields}")]
    Validation {
        /// Comma separated field names
        fields: String,
    },

    /// Filter key not declared in the schema
    #[error("Unknown filter '{filter}'")]
    UnknownFilter {
        /// Filter key
        filter: String,
    },

    /// Dropdown value not among the declared options
    #[error("Unknown option '{value}' for filter '{filter}'")]
    UnknownFilterOption {
        /// Filter key
        filter: String,
        /// Rejected value
        value: String,
    },

    /// Sort column not offered by the page
    #[error("Unknown sort column '{column}'")]
    UnknownSort {
        /// Column key
        column: String,
    },

    /// The dialog is not in a state that can be saved
    #[error("Nothing to save: dialog is {state}")]
    NothingToSave {
        /// Current dialog state
        state: &'static str,
    },

    /// Repository backend failure (transport, HTTP status, decoding)
    #[error("Backend error: {0}")]
    Backend(#[source] BoxError),
}

impl RecordError {
    /// Wrap a backend error
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(error))
    }

    /// Wrap a backend error given only as a message
    pub fn backend_message(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::Backend(message.into())
    }

    /// Whether this error came from the backend rather than local checks
    pub const fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_))
    }
}

impl From<validator::ValidationErrors> for RecordError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors.errors().keys().map(ToString::to_string).collect();
        fields.sort_unstable();
        Self::Validation {
            fields: fields.join(","),
        }
    }
}

impl From<RecordError> for erp_core::Error {
    fn from(error: RecordError) -> Self {
        match error {
            RecordError::NotFound { resource, id } => Self::NotFound {
                resource: format!("{resource}/{id}"),
            },
            RecordError::InvalidTransition { from, to } => Self::InvalidTransition { from, to },
            RecordError::Validation { fields } => Self::Validation {
                field: fields,
                message: "required field missing or out of range".to_string(),
            },
            other => Self::Other(other.to_string()),
        }
    }
}
