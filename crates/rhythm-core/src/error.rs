//! Error types for rhythm detection
//!
//! Provides a unified error type for all rhythm-stats crates.

use thiserror::Error;

/// Core error type for rhythm detection operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Series length does not agree with the timepoint layout
    #[error("Length mismatch: expected {expected} observations, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A cell of the series carries the missing-value marker
    #[error("Missing value at observation {index}")]
    MissingValue { index: usize },

    /// Run configuration is malformed or was never built for this request
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for empty input
    pub fn empty_input(operation: &str) -> Self {
        Self::InvalidInput(format!("{operation} requires a non-empty input"))
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::Computation(format!("{context} contains NaN or infinite values"))
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Whether this error concerns a single input row rather than the run
    pub fn is_row_error(&self) -> bool {
        matches!(
            self,
            Self::LengthMismatch { .. } | Self::MissingValue { .. } | Self::InvalidInput(_)
        )
    }
}
