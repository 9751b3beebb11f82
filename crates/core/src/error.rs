//! Error types for the Commerce Insight services.
//!
//! The only hard failures in the analytics core are unreachable data stores
//! and invalid configuration. Sparse data is signaled through empty lists or
//! `None` results at the engine boundaries, never through this type.

use thiserror::Error;

/// Top-level error type shared across the workspace
#[derive(Debug, Error)]
pub enum CommerceInsightError {
    /// Configuration value missing or invalid
    #[error("configuration error: {message}")]
    ConfigurationError {
        message: String,
        key: Option<String>,
    },

    /// The backing store is unreachable or a query failed
    #[error("data store unavailable: {0}")]
    Database(#[from] sqlx::Error),

    /// Caller-supplied input failed validation
    #[error("validation error: {0}")]
    Validation(String),
}

impl CommerceInsightError {
    pub fn configuration(message: impl Into<String>, key: Option<&str>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            key: key.map(|k| k.to_string()),
        }
    }
}
