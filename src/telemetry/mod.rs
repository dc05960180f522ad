//! Telemetry: streaming structure and steps to a remote collector.
//!
//! ## Contents
//! - [`TelemetryConnection`] the subscriber that introduces the tree and forwards steps
//! - [`ConnectionConfig`] collector address, room, inactivity and retry knobs
//! - [`Connector`], [`Channel`] the transport seam
//! - [`SocketIoConnector`] Socket.IO over websocket (feature `socketio`)
//! - [`default_room_name`], [`sanitize_room`] room naming
//!
//! ## Wire contract
//! ```text
//! introduce(room, structure)   once per (re)connection
//! step(id)                     Entered
//! step(id, true|false|null)    Produced(Success|Failure|Running)
//! ```

mod config;
mod connection;
mod room;
#[cfg(feature = "socketio")]
mod socketio;
mod transport;

pub use config::ConnectionConfig;
pub use connection::TelemetryConnection;
pub use room::{default_room_name, sanitize_room};
#[cfg(feature = "socketio")]
pub use socketio::SocketIoConnector;
pub use transport::{Channel, Connector};
