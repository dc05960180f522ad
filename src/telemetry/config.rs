//! # Telemetry connection configuration.
//!
//! [`ConnectionConfig`] describes where the collector lives and how the
//! connection behaves when it goes quiet or cannot be reached.
//!
//! ## Fields
//! - `host`, `port`: collector address.
//! - `room`: room to publish into; `None` derives one from host and program name.
//! - `namespace`: Socket.IO namespace the collector accepts trees on.
//! - `inactivity`: silence after which the next step reconnects first.
//! - `reconnect`, `max_attempts`: bounded retry for one reconnect.
//! - `detail`: verbosity of the structure sent with `introduce`.

use std::time::Duration;

use crate::policies::BackoffPolicy;
use crate::tree::Detail;

use super::room::default_room_name;

/// Collector connection settings.
#[derive(Clone, Debug)]
pub struct ConnectionConfig {
    /// Collector host name or address.
    pub host: String,
    /// Collector port.
    pub port: u16,
    /// Room to publish into.
    pub room: Option<String>,
    /// Socket.IO namespace.
    pub namespace: String,
    /// Inactivity threshold before reconnecting.
    pub inactivity: Duration,
    /// Delays between failed open attempts.
    pub reconnect: BackoffPolicy,
    /// Open attempts per reconnect (clamped to at least 1).
    pub max_attempts: u32,
    /// Structure verbosity in `introduce`.
    pub detail: Detail,
}

impl Default for ConnectionConfig {
    /// Returns a configuration with:
    /// - `host = "localhost"`, `port = 3000`;
    /// - `room = None` (derived);
    /// - `namespace = "/accept"`;
    /// - `inactivity = 30s`;
    /// - `reconnect = BackoffPolicy::default()`, `max_attempts = 3`;
    /// - `detail = Detail::Full`.
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3000,
            room: None,
            namespace: "/accept".to_string(),
            inactivity: Duration::from_secs(30),
            reconnect: BackoffPolicy::default(),
            max_attempts: 3,
            detail: Detail::Full,
        }
    }
}

impl ConnectionConfig {
    /// Config for `host:port` with every other field at its default.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// Configured room, or the derived default when none is set.
    pub fn room_or_default(&self) -> String {
        self.room.clone().unwrap_or_else(default_room_name)
    }

    /// Open attempts per reconnect, never zero.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Human-facing viewer URL for a room.
    pub fn viewer_url(&self, room: &str) -> String {
        format!("http://{}:{}/{}", self.host, self.port, room)
    }
}
