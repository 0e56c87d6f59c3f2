//! Error types for the ERP record workbench

use std::{error::Error as StdError, fmt};

/// Main error type shared by the workbench crates
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(std::io::Error),

    /// Configuration error
    Configuration {
        /// Error message
        message: String,
    },

    /// Validation error
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// Database error
    Database(String),

    /// Record not found
    NotFound {
        /// Resource that was not found
        resource: String,
    },

    /// Status change not allowed by the transition table
    InvalidTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// Authentication error
    Authentication(String),

    /// Timeout error
    Timeout {
        /// Timeout duration in milliseconds
        duration_ms: u64,
    },

    /// Serialization error
    Serialization(serde_json::Error),

    /// Other error
    Other(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::Validation { field, message } => {
                write!(f, "Validation error: {field} - {message}")
            }
            Self::Database(msg) => write!(f, "Database error: {msg}"),
            Self::NotFound { resource } => write!(f, "Resource not found: {resource}"),
            Self::InvalidTransition { from, to } => {
                write!(f, "Status transition not allowed: {from} -> {to}")
            }
            Self::Authentication(msg) => write!(f, "Authentication failed: {msg}"),
            Self::Timeout { duration_ms } => {
                write!(f, "Operation timed out after {duration_ms}ms")
            }
            Self::Serialization(err) => write!(f, "Serialization error: {err}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors.errors().keys().map(ToString::to_string).collect();
        fields.sort_unstable();
        Self::Validation {
            field: fields.join(","),
            message: "required field missing or out of range".to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io;

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let app_error = Error::from(io_error);

        assert!(matches!(app_error, Error::Io(_)));
        assert!(format!("{}", app_error).contains("I/O error"));
        assert!(app_error.source().is_some());
    }

    #[test]
    fn test_invalid_transition_display() {
        let error = Error::InvalidTransition {
            from: "approved".to_string(),
            to: "rejected".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Status transition not allowed: approved -> rejected"
        );
        assert!(error.source().is_none());
    }

    #[test]
    fn test_not_found_display() {
        let error = Error::NotFound {
            resource: "invoices/42".to_string(),
        };
        assert_eq!(error.to_string(), "Resource not found: invoices/42");
    }

    #[test]
    fn test_serialization_error_source() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        let app_error = Error::from(json_error);

        assert!(app_error.to_string().starts_with("Serialization error"));
        assert!(app_error.source().is_some());
    }

    #[test]
    fn test_all_error_display_variants() {
        let cases = vec![
            (
                Error::Configuration {
                    message: "bad url".to_string(),
                },
                "Configuration error: bad url",
            ),
            (
                Error::Validation {
                    field: "title".to_string(),
                    message: "required".to_string(),
                },
                "Validation error: title - required",
            ),
            (Error::Database("down".to_string()), "Database error: down"),
            (
                Error::Authentication("no token".to_string()),
                "Authentication failed: no token",
            ),
            (
                Error::Timeout { duration_ms: 5000 },
                "Operation timed out after 5000ms",
            ),
            (Error::Other("plain".to_string()), "plain"),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }
}
