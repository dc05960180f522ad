//! Error types used by treewatch.
//!
//! - [`WatchError`]: usage errors raised by the one-time wiring calls.
//! - [`TransportError`]: failures talking to the collector. These never reach
//!   the code driving the tree; the connection logs them and applies its
//!   reconnect policy.
//!
//! Both types provide `as_label` / `as_message` for logging.

use thiserror::Error;

/// # Usage errors.
///
/// Returned when a one-time operation is invoked more than once.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WatchError {
    /// `TreeWatch::connect` was already called for this tree.
    #[error("tree is already connected to a telemetry collector")]
    AlreadyConnected,

    /// `TelemetryConnection::set_introduction` was already called.
    #[error("connection introduction is already set")]
    AlreadyIntroduced,
}

impl WatchError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use treewatch::WatchError;
    ///
    /// assert_eq!(WatchError::AlreadyConnected.as_label(), "watch_already_connected");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WatchError::AlreadyConnected => "watch_already_connected",
            WatchError::AlreadyIntroduced => "watch_already_introduced",
        }
    }

    /// Returns a human-readable message.
    pub fn as_message(&self) -> String {
        self.to_string()
    }
}

/// # Collector transport errors.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TransportError {
    /// Opening the connection failed.
    #[error("cannot connect to {endpoint}: {error}")]
    Connect {
        /// Collector URL.
        endpoint: String,
        /// The underlying error message.
        error: String,
    },

    /// Writing a frame failed.
    #[error("send failed: {error}")]
    Send {
        /// The underlying error message.
        error: String,
    },

    /// The peer closed the connection.
    #[error("connection closed by peer")]
    Closed,
}

impl TransportError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use treewatch::TransportError;
    ///
    /// let err = TransportError::Send { error: "broken pipe".into() };
    /// assert_eq!(err.as_label(), "transport_send");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TransportError::Connect { .. } => "transport_connect",
            TransportError::Send { .. } => "transport_send",
            TransportError::Closed => "transport_closed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TransportError::Connect { endpoint, error } => {
                format!("connect {endpoint}: {error}")
            }
            TransportError::Send { error } => format!("send: {error}"),
            TransportError::Closed => "closed".to_string(),
        }
    }
}
