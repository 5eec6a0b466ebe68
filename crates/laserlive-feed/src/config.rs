//! Feed configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::FeedError;

/// Complete feed configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    /// Relay `WebSocket` URL (e.g. `ws://localhost:8080/ws`).
    pub relay_url: String,
    /// Path of the TDF log to feed.
    pub feed_file: PathBuf,
    /// Pacing multiplier; `0` sends as fast as possible.
    pub speed: f64,
    /// Wait between reconnection attempts.
    pub reconnect_delay: Duration,
}

impl FeedConfig {
    /// Load configuration from environment variables.
    ///
    /// Required variables:
    /// - `RELAY_URL` -- relay `WebSocket` endpoint
    /// - `FEED_FILE` -- path of the TDF log
    ///
    /// Optional variables:
    /// - `FEED_SPEED` -- pacing multiplier (default 0, unpaced)
    /// - `RECONNECT_DELAY_MS` -- reconnect wait (default 3000)
    pub fn from_env() -> Result<Self, FeedError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, FeedError> {
        let relay_url = required(&lookup, "RELAY_URL")?;
        let feed_file = PathBuf::from(required(&lookup, "FEED_FILE")?);

        let speed = match lookup("FEED_SPEED") {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|e| FeedError::Config(format!("invalid FEED_SPEED: {e}")))?,
            None => 0.0,
        };
        if !speed.is_finite() || speed < 0.0 {
            return Err(FeedError::Config(format!(
                "FEED_SPEED must be a non-negative number, got {speed}"
            )));
        }

        let reconnect_ms = match lookup("RECONNECT_DELAY_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| FeedError::Config(format!("invalid RECONNECT_DELAY_MS: {e}")))?,
            None => 3000,
        };

        Ok(Self {
            relay_url,
            feed_file,
            speed,
            reconnect_delay: Duration::from_millis(reconnect_ms),
        })
    }
}

/// Read a required variable; empty counts as missing.
fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, FeedError> {
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| FeedError::Config(format!("missing required env var {name}")))
}
