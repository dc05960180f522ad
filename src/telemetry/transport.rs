//! # Transport seam between the connection and the wire.
//!
//! [`Connector`] opens [`Channel`]s; [`Channel`] sends named events with JSON
//! arguments and keep-alive frames. [`SocketIoConnector`](super::SocketIoConnector)
//! is the production implementation; tests plug in recording connectors.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;

use super::config::ConnectionConfig;

/// Opens connections to a collector.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Establishes a fresh channel (namespace joined, ready to emit).
    async fn open(&self, config: &ConnectionConfig) -> Result<Box<dyn Channel>, TransportError>;
}

/// An established connection.
#[async_trait]
pub trait Channel: Send {
    /// Sends a named event with positional arguments.
    async fn emit(&mut self, event: &str, args: Vec<Value>) -> Result<(), TransportError>;

    /// Sends a keep-alive frame.
    async fn keep_alive(&mut self) -> Result<(), TransportError>;

    /// Closes the connection; errors are ignored.
    async fn close(&mut self);
}
