//! # TelemetryConnection: forwards tree events to a remote collector.
//!
//! ## Lifecycle
//! ```text
//! set_introduction(structure)          (once; AlreadyIntroduced afterwards)
//!   └─► reconnect()
//!
//! step(id, value?):
//!   closed?                             ─► ignore
//!   now - anchor > inactivity           ─► reconnect()
//!   channel down                        ─► drop step (debug)
//!   emit("step", [id, value?]) + keep_alive
//!       ok  ─► anchor = now
//!       err ─► channel down (warn)
//!
//! reconnect():
//!   close old channel; anchor = now
//!   for attempt in 0..max_attempts:
//!       open ─► emit("introduce", [room, structure]) + keep_alive ─► up, done
//!       fail ─► sleep(reconnect.next(attempt))       (cancelled by close())
//!   exhausted ─► stay down until the next inactivity window
//! ```
//!
//! ## Rules
//! - Runs on the caller's path; there is no background task or timer.
//! - Transport errors never reach the caller; they are logged and handled here.
//! - `Entered` steps carry only the id; `Produced` steps add `true`/`false`/`null`.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{TransportError, WatchError};
use crate::events::Event;
use crate::nodes::Status;
use crate::subscribers::Subscribe;
use crate::tree::{NodeId, StructureDescriptor};

use super::config::ConnectionConfig;
use super::transport::{Channel, Connector};

struct State {
    channel: Option<Box<dyn Channel>>,
    /// Last successful send or last reconnect attempt.
    anchor: Instant,
}

/// Event subscriber streaming steps to a collector.
pub struct TelemetryConnection {
    config: ConnectionConfig,
    room: String,
    connector: Arc<dyn Connector>,
    intro: OnceLock<Value>,
    state: Mutex<State>,
    closed: CancellationToken,
}

impl TelemetryConnection {
    /// Creates an unconnected connection; nothing is sent until
    /// [`set_introduction`](Self::set_introduction).
    pub fn new(config: ConnectionConfig, connector: impl Connector) -> Self {
        let room = config.room_or_default();
        Self {
            config,
            room,
            connector: Arc::new(connector),
            intro: OnceLock::new(),
            state: Mutex::new(State {
                channel: None,
                anchor: Instant::now(),
            }),
            closed: CancellationToken::new(),
        }
    }

    /// Connection over the built-in Socket.IO transport.
    #[cfg(feature = "socketio")]
    pub fn socketio(config: ConnectionConfig) -> Self {
        Self::new(config, super::socketio::SocketIoConnector::new())
    }

    /// Room this connection publishes into.
    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Whether a channel is currently established.
    pub async fn is_connected(&self) -> bool {
        self.state.lock().await.channel.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Stores the structure sent with every `introduce` and connects.
    ///
    /// Fails with [`WatchError::AlreadyIntroduced`] on a second call.
    pub async fn set_introduction(&self, structure: &StructureDescriptor) -> Result<(), WatchError> {
        self.intro
            .set(structure.to_json(self.config.detail))
            .map_err(|_| WatchError::AlreadyIntroduced)?;
        let mut state = self.state.lock().await;
        self.reconnect(&mut state).await;
        Ok(())
    }

    /// Sends one step message, reconnecting first after a quiet period.
    pub async fn step(&self, id: &NodeId, value: Option<Status>) {
        if self.is_closed() {
            return;
        }
        if self.intro.get().is_none() {
            tracing::debug!(id = %id, "step before introduction; dropped");
            return;
        }

        let mut state = self.state.lock().await;
        if state.anchor.elapsed() > self.config.inactivity {
            tracing::debug!(room = %self.room, "inactivity threshold passed; reconnecting");
            self.reconnect(&mut state).await;
        }

        let Some(channel) = state.channel.as_mut() else {
            tracing::debug!(id = %id, room = %self.room, "collector unreachable; step dropped");
            return;
        };

        let mut args = vec![Value::String(id.to_string())];
        if let Some(status) = value {
            args.push(serde_json::to_value(status).unwrap_or(Value::Null));
        }

        match send(channel.as_mut(), "step", args).await {
            Ok(()) => state.anchor = Instant::now(),
            Err(e) => {
                tracing::warn!(
                    room = %self.room,
                    error = %e.as_message(),
                    label = e.as_label(),
                    "step send failed; connection marked down"
                );
                if let Some(mut ch) = state.channel.take() {
                    ch.close().await;
                }
            }
        }
    }

    /// Closes the channel; pending backoff sleeps end and later steps are ignored.
    pub async fn close(&self) {
        self.closed.cancel();
        let mut state = self.state.lock().await;
        if let Some(mut ch) = state.channel.take() {
            ch.close().await;
        }
    }

    async fn reconnect(&self, state: &mut State) {
        if let Some(mut old) = state.channel.take() {
            old.close().await;
        }
        state.anchor = Instant::now();

        let Some(intro) = self.intro.get() else {
            return;
        };
        let attempts = self.config.attempts();
        for attempt in 0..attempts {
            if self.is_closed() {
                return;
            }
            match self.open_and_introduce(intro).await {
                Ok(channel) => {
                    state.channel = Some(channel);
                    state.anchor = Instant::now();
                    tracing::info!(
                        url = %self.config.viewer_url(&self.room),
                        room = %self.room,
                        "publishing tree"
                    );
                    return;
                }
                Err(e) if attempt + 1 < attempts => {
                    let delay = self.config.reconnect.next(attempt);
                    tracing::warn!(
                        attempt = attempt + 1,
                        delay = ?delay,
                        error = %e.as_message(),
                        "collector connect failed; retrying"
                    );
                    tokio::select! {
                        _ = self.closed.cancelled() => return,
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        error = %e.as_message(),
                        "collector connect failed; giving up until next inactivity window"
                    );
                }
            }
        }
        state.anchor = Instant::now();
    }

    async fn open_and_introduce(&self, intro: &Value) -> Result<Box<dyn Channel>, TransportError> {
        let mut channel = self.connector.open(&self.config).await?;
        let args = vec![Value::String(self.room.clone()), intro.clone()];
        if let Err(e) = send(channel.as_mut(), "introduce", args).await {
            channel.close().await;
            return Err(e);
        }
        Ok(channel)
    }
}

/// Emits one event followed by a keep-alive frame.
async fn send(channel: &mut dyn Channel, event: &str, args: Vec<Value>) -> Result<(), TransportError> {
    channel.emit(event, args).await?;
    channel.keep_alive().await
}

#[async_trait]
impl Subscribe for TelemetryConnection {
    async fn on_event(&self, ev: &Event) {
        self.step(&ev.id, ev.status()).await;
    }

    fn name(&self) -> &'static str {
        "telemetry"
    }
}

impl std::fmt::Debug for TelemetryConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryConnection")
            .field("room", &self.room)
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("closed", &self.is_closed())
            .finish()
    }
}
