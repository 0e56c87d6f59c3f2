//! Error types for the test runners

use erp_client::ClientError;
use thiserror::Error;

/// Result type alias for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Errors raised while preparing or running a test run
#[derive(Error, Debug)]
pub enum HarnessError {
    /// API call failed during setup
    #[error("API error: {0}")]
    Client(#[from] ClientError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] erp_core::Error),

    /// A `--stage` argument did not parse
    #[error("Invalid stage '{input}': {reason}")]
    InvalidStage {
        /// Rejected argument
        input: String,
        /// What was wrong
        reason: String,
    },

    /// Setup could not complete
    #[error("Setup failed: {message}")]
    Setup {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// Create a setup error
    pub fn setup<S: Into<String>>(message: S) -> Self {
        Self::Setup {
            message: message.into(),
        }
    }

    /// Create a stage parse error
    pub fn invalid_stage<S: Into<String>>(input: &str, reason: S) -> Self {
        Self::InvalidStage {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
