//! Error types shared by the silo crates

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use miette::Diagnostic;
use std::path::Path;
use thiserror::Error;

/// Error type for silo operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// I/O error with optional path context
    #[error("I/O {operation} failed{}", path.as_ref().map_or(String::new(), |p| format!(": {}", p.display())))]
    #[diagnostic(
        code(silo::io),
        help("Check file permissions and ensure the path exists")
    )]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Path that caused the error, if available
        path: Option<Box<Path>>,
        /// Operation that failed (e.g., "read", "write", "create")
        operation: String,
    },

    /// Serialization or deserialization error
    #[error("Serialization error: {message}")]
    #[diagnostic(code(silo::serialization))]
    Serialization {
        /// Error message describing the serialization issue
        message: String,
    },

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    #[diagnostic(code(silo::configuration))]
    Configuration {
        /// Error message describing the configuration issue
        message: String,
    },
}

impl Error {
    /// Create an I/O error with path context
    #[must_use]
    pub fn io(
        source: std::io::Error,
        path: impl AsRef<Path>,
        operation: impl Into<String>,
    ) -> Self {
        Self::Io {
            source,
            path: Some(path.as_ref().into()),
            operation: operation.into(),
        }
    }

    /// Create an I/O error without path context
    #[must_use]
    pub fn io_no_path(source: std::io::Error, operation: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: None,
            operation: operation.into(),
        }
    }

    /// Create a serialization error
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
        }
    }
}

/// Result type for silo operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_includes_path() {
        let err = Error::io(
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            "/tmp/some-cache",
            "read",
        );
        let msg = err.to_string();
        assert!(msg.contains("read"));
        assert!(msg.contains("/tmp/some-cache"));
    }

    #[test]
    fn test_io_error_without_path() {
        let err = Error::io_no_path(std::io::Error::other("boom"), "rename");
        assert_eq!(err.to_string(), "I/O rename failed");
    }

    #[test]
    fn test_serialization_error_message() {
        let err = Error::serialization("bad record");
        assert!(err.to_string().contains("bad record"));
    }
}
