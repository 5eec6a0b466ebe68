//! Error types for the feed.

/// Errors that can occur while feeding a log to the relay.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Required configuration is missing or invalid.
    #[error("config error: {0}")]
    Config(String),

    /// The log file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The relay connection failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// An item could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
