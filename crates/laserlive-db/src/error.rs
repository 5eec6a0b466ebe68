//! Error types for the live state layer.
//!
//! All errors are propagated via [`DbError`] which wraps the underlying
//! [`fred`] and [`serde_json`] errors.

/// Errors that can occur in the live state layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `Dragonfly`/Redis operation failed.
    #[error("Dragonfly error: {0}")]
    Dragonfly(#[from] fred::error::Error),

    /// A serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A script returned a reply of an unexpected shape.
    #[error("Unexpected reply: {0}")]
    UnexpectedReply(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
