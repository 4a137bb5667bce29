//! Error types for histogram fidelity analysis
//!
//! Provides a unified error type for all fidelity crates.

use thiserror::Error;

/// Core error type for fidelity operations
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

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// A lookup key that is not part of any known table
    #[error("Unknown {kind} key: '{key}'")]
    UnknownKey { kind: &'static str, key: String },

    /// Structurally invalid or incomplete configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration (de)serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for empty input
    pub fn empty_input(_operation: &str) -> Self {
        Self::InsufficientData {
            expected: 1,
            actual: 0,
        }
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

    /// Create an error for an unrecognised table key
    pub fn unknown_key(kind: &'static str, key: impl Into<String>) -> Self {
        Self::UnknownKey {
            kind,
            key: key.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidParameter("num_bins must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: num_bins must be positive");

        let err = Error::InvalidInput("edges are not increasing".to_string());
        assert_eq!(err.to_string(), "Invalid input: edges are not increasing");

        let err = Error::InsufficientData { expected: 10, actual: 5 };
        assert_eq!(
            err.to_string(),
            "Insufficient data: expected at least 10 samples, got 5"
        );

        let err = Error::Computation("lock poisoned".to_string());
        assert_eq!(err.to_string(), "Computation error: lock poisoned");

        let err = Error::InvalidConfig("variance.good is missing".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: variance.good is missing"
        );
    }

    #[test]
    fn test_error_helper_functions() {
        let err = Error::empty_input("histogram construction");
        match err {
            Error::InsufficientData { expected, actual } => {
                assert_eq!(expected, 1);
                assert_eq!(actual, 0);
            }
            _ => panic!("Wrong error type"),
        }

        let err = Error::size_mismatch(11, 10, "histogram edges");
        assert_eq!(
            err.to_string(),
            "Invalid input: Size mismatch in histogram edges: expected 11, got 10"
        );

        let err = Error::non_finite("sample");
        assert_eq!(
            err.to_string(),
            "Computation error: sample contains NaN or infinite values"
        );

        let err = Error::unknown_key("distribution type", "bimodal-ish");
        assert_eq!(
            err.to_string(),
            "Unknown distribution type key: 'bimodal-ish'"
        );
    }

    #[test]
    fn test_error_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_error_from_io_error() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        match err {
            Error::Io(_) => {
                assert!(err.to_string().contains("file not found"));
            }
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_error_from_anyhow() {
        let anyhow_err = anyhow::anyhow!("custom error message");
        let err: Error = anyhow_err.into();
        assert!(matches!(err, Error::Other(_)));
        assert!(err.to_string().contains("custom error message"));
    }
}
