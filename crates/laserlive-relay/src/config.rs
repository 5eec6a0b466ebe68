//! Relay configuration loaded from the environment.
//!
//! A relay without a reachable store would accept viewers it can never
//! serve, so missing or malformed settings are fatal at startup.

use laserlive_db::DEFAULT_MAX_EVENT_HISTORY;

use crate::error::RelayError;
use crate::state::DEFAULT_OUTBOUND_QUEUE;

/// Which store backs the cache and registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// A `Dragonfly`/Redis instance at the given URL.
    Dragonfly {
        /// Redis URL, e.g. `redis://localhost:6379`.
        url: String,
    },
    /// In-process memory (single relay, state lost on restart).
    Memory,
}

/// Complete relay configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Store backend.
    pub store: StoreBackend,
    /// Key the cached game state lives under.
    pub state_key: String,
    /// Maximum number of cached events.
    pub max_event_history: usize,
    /// Address to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Per-connection outbound queue capacity.
    pub outbound_queue: usize,
}

impl RelayConfig {
    /// Load configuration from environment variables.
    ///
    /// Required variables:
    /// - `DRAGONFLY_URL` -- store URL (unless `LIVE_STORE=memory`)
    ///
    /// Optional variables:
    /// - `LIVE_STORE` -- `dragonfly` (default) or `memory`
    /// - `STATE_KEY` -- cache key (default `current`)
    /// - `MAX_EVENT_HISTORY` -- cached event bound (default 600)
    /// - `RELAY_HOST` -- bind address (default `0.0.0.0`)
    /// - `RELAY_PORT` -- listen port (default 8080)
    /// - `OUTBOUND_QUEUE` -- per-connection queue capacity (default 1024);
    ///   must exceed `MAX_EVENT_HISTORY` so a full replay fits
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RelayError> {
        let backend = lookup("LIVE_STORE").unwrap_or_else(|| String::from("dragonfly"));
        let store = match backend.to_lowercase().as_str() {
            "dragonfly" | "redis" => StoreBackend::Dragonfly {
                url: required(&lookup, "DRAGONFLY_URL")?,
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(RelayError::Config(format!("unknown LIVE_STORE: {other}")));
            }
        };

        let max_event_history: usize = parsed(&lookup, "MAX_EVENT_HISTORY", DEFAULT_MAX_EVENT_HISTORY)?;
        if max_event_history == 0 {
            return Err(RelayError::Config(String::from(
                "MAX_EVENT_HISTORY must be at least 1",
            )));
        }

        // A replay queues the metadata plus every cached event at once.
        let outbound_queue: usize = parsed(&lookup, "OUTBOUND_QUEUE", DEFAULT_OUTBOUND_QUEUE)?;
        if outbound_queue <= max_event_history {
            return Err(RelayError::Config(format!(
                "OUTBOUND_QUEUE ({outbound_queue}) must exceed MAX_EVENT_HISTORY ({max_event_history})"
            )));
        }

        Ok(Self {
            store,
            state_key: lookup("STATE_KEY").unwrap_or_else(|| String::from("current")),
            max_event_history,
            host: lookup("RELAY_HOST").unwrap_or_else(|| String::from("0.0.0.0")),
            port: parsed(&lookup, "RELAY_PORT", 8080)?,
            outbound_queue,
        })
    }
}

/// Read a required variable; empty counts as missing.
fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, RelayError> {
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| RelayError::Config(format!("missing required env var {name}")))
}

/// Parse an optional variable, falling back to `default` when unset.
fn parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, RelayError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    lookup(name).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e| RelayError::Config(format!("invalid {name}: {e}")))
    })
}
