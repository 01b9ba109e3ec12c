//! Error types for Parlor
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Parlor operations
///
/// This enum encompasses all possible errors that can occur during
/// session management, provider interactions, configuration loading,
/// and export operations.
#[derive(Error, Debug)]
pub enum ParlorError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local input validation failures (blank submission, password mismatch)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication errors (bad credentials, unknown account)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Reply provider errors (simulated assistant failures)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Search provider errors
    #[error("Search error: {0}")]
    Search(String),

    /// Completion provider errors
    #[error("Completion error: {0}")]
    Completion(String),

    /// Attachment storage errors
    #[error("Attachment error: {0}")]
    Attachment(String),

    /// Export errors (layout or filesystem failures)
    #[error("Export error: {0}")]
    Export(String),

    /// Session lookup failures
    #[error("Session not found: {0}")]
    SessionNotFound(uuid::Uuid),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for Parlor operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
