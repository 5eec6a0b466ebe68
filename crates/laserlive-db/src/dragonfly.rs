//! `Dragonfly` (Redis-compatible) backend for the live state.
//!
//! Relay handlers run independently and may overlap, so every mutation
//! that touches more than one key, or reads and then writes, runs as a
//! server-side Lua script. A script executes atomically; concurrent
//! appends can never lose an event or observe a half-trimmed list.
//!
//! # Key Patterns
//!
//! | Pattern | Type | Description |
//! |---------|------|-------------|
//! | `live:{key}:metadata` | JSON | Current game metadata |
//! | `live:{key}:events` | List | Cached events as JSON strings, oldest first |
//! | `live:{key}:connections:{relay}` | Set | Viewer connection ids held by one relay |

use fred::interfaces::LuaInterface;
use fred::prelude::*;
use fred::types::Value;
use laserlive_types::{ConnectionId, GameMetadata, RelayId};

use crate::error::DbError;
use crate::state::{CachedState, decode_metadata};

/// Overwrite metadata and clear the event list in one step.
///
/// KEYS: metadata, events. ARGV: metadata JSON.
const SET_METADATA_SCRIPT: &str = r"
redis.call('SET', KEYS[1], ARGV[1])
redis.call('DEL', KEYS[2])
return 1
";

/// Append one event and trim the list to its bound in one step.
///
/// KEYS: events. ARGV: event JSON, bound. Returns the resulting length.
const APPEND_EVENT_SCRIPT: &str = r"
local len = redis.call('RPUSH', KEYS[1], ARGV[1])
local bound = tonumber(ARGV[2])
if len > bound then
  redis.call('LTRIM', KEYS[1], -bound, -1)
  len = bound
end
return len
";

/// Read metadata and events as one consistent snapshot.
///
/// KEYS: metadata, events. Returns `{metadata or false, events}`.
const READ_STATE_SCRIPT: &str = r"
local metadata = redis.call('GET', KEYS[1])
local events = redis.call('LRANGE', KEYS[2], 0, -1)
return {metadata, events}
";

/// Connection handle to a `Dragonfly` (Redis-compatible) instance.
///
/// Wraps a [`fred::prelude::Client`] and scopes the cache keys to one
/// state key so several relays can share an instance.
#[derive(Clone)]
pub struct DragonflyPool {
    client: Client,
    metadata_key: String,
    events_key: String,
    connections_prefix: String,
}

impl DragonflyPool {
    /// Connect to `Dragonfly` at the given URL.
    ///
    /// The URL should follow the Redis URL scheme:
    /// `redis://host:port` or `redis://host:port/db`
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if the URL cannot be parsed.
    /// Returns [`DbError::Dragonfly`] if the connection fails.
    pub async fn connect(url: &str, state_key: &str) -> Result<Self, DbError> {
        let config = Config::from_url(url)
            .map_err(|e| DbError::Config(format!("Invalid Dragonfly URL: {e}")))?;

        let client = Builder::from_config(config).build()?;
        client.init().await?;

        tracing::info!(state_key, "Connected to Dragonfly");
        Ok(Self {
            client,
            metadata_key: format!("live:{state_key}:metadata"),
            events_key: format!("live:{state_key}:events"),
            connections_prefix: format!("live:{state_key}:connections"),
        })
    }

    fn connections_key(&self, relay: RelayId) -> String {
        format!("{}:{relay}", self.connections_prefix)
    }

    // =========================================================================
    // Live State Cache -- live:{key}:metadata, live:{key}:events
    // =========================================================================

    /// Read metadata and the full event history in one round trip.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Dragonfly`] if the read fails, or
    /// [`DbError::UnexpectedReply`] if the script reply is malformed.
    pub async fn get_state(&self) -> Result<CachedState, DbError> {
        let reply: Value = self
            .client
            .eval(
                READ_STATE_SCRIPT,
                vec![self.metadata_key.clone(), self.events_key.clone()],
                Vec::<String>::new(),
            )
            .await?;

        let mut parts = reply.into_array().into_iter();
        let (Some(metadata), Some(events)) = (parts.next(), parts.next()) else {
            return Err(DbError::UnexpectedReply(String::from(
                "state script must return two elements",
            )));
        };

        let metadata: Option<String> = metadata.convert()?;
        let events: Vec<String> = events.convert()?;

        Ok(CachedState {
            metadata: metadata.as_deref().and_then(decode_metadata),
            events,
        })
    }

    /// Overwrite the metadata and clear the event history.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if serialization or the write fails.
    pub async fn set_metadata(&self, metadata: &GameMetadata) -> Result<(), DbError> {
        let json = serde_json::to_string(metadata)?;
        let _: i64 = self
            .client
            .eval(
                SET_METADATA_SCRIPT,
                vec![self.metadata_key.clone(), self.events_key.clone()],
                vec![json],
            )
            .await?;
        Ok(())
    }

    /// Append a serialized event and trim the history to `bound` entries.
    ///
    /// Returns the history length after the append.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Dragonfly`] if the script fails.
    pub async fn append_event_with_trim(
        &self,
        serialized: &str,
        bound: usize,
    ) -> Result<usize, DbError> {
        let len: i64 = self
            .client
            .eval(
                APPEND_EVENT_SCRIPT,
                vec![self.events_key.clone()],
                vec![serialized.to_owned(), bound.to_string()],
            )
            .await?;
        usize::try_from(len)
            .map_err(|e| DbError::UnexpectedReply(format!("negative list length {len}: {e}")))
    }

    // =========================================================================
    // Connection Registry -- live:{key}:connections:{relay} (set)
    // =========================================================================

    /// Register a viewer connection held by `relay`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Dragonfly`] if the write fails.
    pub async fn add_connection(&self, relay: RelayId, id: ConnectionId) -> Result<(), DbError> {
        let _: u32 = self
            .client
            .sadd(self.connections_key(relay), id.to_string().as_str())
            .await?;
        Ok(())
    }

    /// Remove a viewer connection held by `relay`. Removing an unknown id
    /// is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Dragonfly`] if the write fails.
    pub async fn remove_connection(&self, relay: RelayId, id: ConnectionId) -> Result<(), DbError> {
        let _: u32 = self
            .client
            .srem(self.connections_key(relay), id.to_string().as_str())
            .await?;
        Ok(())
    }

    /// Connection ids registered by `relay`. Malformed members are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Dragonfly`] if the read fails.
    pub async fn list_connections(&self, relay: RelayId) -> Result<Vec<ConnectionId>, DbError> {
        let members: Vec<String> = self.client.smembers(self.connections_key(relay)).await?;
        let mut ids = Vec::with_capacity(members.len());
        for m in &members {
            match m.parse::<ConnectionId>() {
                Ok(id) => ids.push(id),
                Err(e) => {
                    tracing::warn!(member = m, error = %e, "ignoring malformed connection id");
                }
            }
        }
        Ok(ids)
    }

    /// Flush all keys from the `Dragonfly` instance.
    ///
    /// **WARNING:** This deletes all data. Only use for testing.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Dragonfly`] if the flush fails.
    pub async fn flush_all(&self) -> Result<(), DbError> {
        let _: () = self.client.flushall(false).await?;
        Ok(())
    }

    /// Return a reference to the underlying [`Client`].
    pub const fn client(&self) -> &Client {
        &self.client
    }
}
