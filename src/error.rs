//! Error types for envsweep
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::api::ApiError;

/// All error types that can end a cleanup run
#[derive(Debug, Error)]
pub enum SweepError {
    /// A required input is missing or empty
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// An input is present but cannot be used
    #[error("Invalid input {name}: {reason}")]
    InvalidInput { name: String, reason: String },

    /// Remote API failure
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Writing outputs or the summary failed
    #[error("Output error: {0}")]
    Output(String),
}

impl SweepError {
    pub fn invalid_input(name: impl Into<String>, reason: impl Into<String>) -> Self {
        SweepError::InvalidInput {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for envsweep operations
pub type Result<T> = std::result::Result<T, SweepError>;
