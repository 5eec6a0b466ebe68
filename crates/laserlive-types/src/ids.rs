//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Relay processes and their viewer connections are the only entities
//! that get minted identifiers. Player and base identifiers come verbatim
//! from the telemetry log and stay plain strings.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Opaque handle for one open viewer connection.
    ///
    /// Lifecycle: connect, then broadcast/replay target, then disconnect
    /// or pruned once detected unreachable.
    ConnectionId
}

define_id! {
    /// Identity of one relay process.
    ///
    /// Scopes the connection registry, so relays sharing a store only
    /// ever broadcast to and prune their own sockets.
    RelayId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_id_round_trips_through_display() {
        let id = ConnectionId::new();
        let parsed: ConnectionId = id.to_string().parse().unwrap_or_default();
        assert_eq!(parsed, id);
    }

    #[test]
    fn relay_ids_are_distinct_and_parse_back() {
        let a = RelayId::new();
        let b = RelayId::new();
        assert_ne!(a, b);
        assert_eq!(a.to_string().parse::<RelayId>().ok(), Some(a));
        assert_eq!(Uuid::from(b), b.into_inner());
    }

    #[test]
    fn connection_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<ConnectionId>().is_err());
    }
}
