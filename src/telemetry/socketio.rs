//! # Socket.IO collector transport.
//!
//! Minimal Socket.IO 2.x client (Engine.IO protocol 3) over a websocket,
//! enough to emit events into one namespace.
//!
//! ## Frames
//! ```text
//! open namespace   40/accept,
//! emit event       42/accept,["step","b",true]
//! keep-alive       2            (engine.io ping; server answers 3)
//! server ping      2  ──► 3     (answered while draining inbound frames)
//! ```
//!
//! Inbound frames are drained without blocking before every write; their
//! content is otherwise ignored.

use async_trait::async_trait;
use futures::{FutureExt, SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::error::TransportError;

use super::config::ConnectionConfig;
use super::transport::{Channel, Connector};

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens Socket.IO channels over `ws://host:port/socket.io/`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SocketIoConnector;

impl SocketIoConnector {
    pub fn new() -> Self {
        Self
    }

    /// Websocket URL of the collector.
    pub fn endpoint(config: &ConnectionConfig) -> String {
        format!(
            "ws://{}:{}/socket.io/?EIO=3&transport=websocket",
            config.host, config.port
        )
    }
}

#[async_trait]
impl Connector for SocketIoConnector {
    async fn open(&self, config: &ConnectionConfig) -> Result<Box<dyn Channel>, TransportError> {
        let endpoint = Self::endpoint(config);
        let (ws, _resp) = connect_async(endpoint.as_str())
            .await
            .map_err(|e| TransportError::Connect {
                endpoint: endpoint.clone(),
                error: e.to_string(),
            })?;

        let mut channel = SocketIoChannel {
            ws,
            prefix: namespace_prefix(&config.namespace),
        };
        channel.write(connect_frame(&channel.prefix)).await?;
        tracing::debug!(endpoint = %endpoint, namespace = %config.namespace, "socket.io namespace opened");
        Ok(Box::new(channel))
    }
}

struct SocketIoChannel {
    ws: Ws,
    prefix: String,
}

impl SocketIoChannel {
    async fn write(&mut self, frame: String) -> Result<(), TransportError> {
        self.drain().await?;
        self.ws
            .send(Message::text(frame))
            .await
            .map_err(|e| TransportError::Send {
                error: e.to_string(),
            })
    }

    /// Consumes whatever the server already sent, answering pings.
    async fn drain(&mut self) -> Result<(), TransportError> {
        while let Some(next) = self.ws.next().now_or_never() {
            match next {
                None | Some(Ok(Message::Close(_))) => return Err(TransportError::Closed),
                Some(Ok(Message::Text(text))) if text.as_str() == "2" => {
                    self.ws
                        .send(Message::text("3"))
                        .await
                        .map_err(|e| TransportError::Send {
                            error: e.to_string(),
                        })?;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    return Err(TransportError::Send {
                        error: e.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Channel for SocketIoChannel {
    async fn emit(&mut self, event: &str, args: Vec<Value>) -> Result<(), TransportError> {
        let frame = event_frame(&self.prefix, event, args)?;
        self.write(frame).await
    }

    async fn keep_alive(&mut self) -> Result<(), TransportError> {
        self.write("2".to_string()).await
    }

    async fn close(&mut self) {
        let _ = self.ws.close(None).await;
    }
}

/// `"/accept"` → `"/accept,"`; the default namespace has no prefix.
fn namespace_prefix(namespace: &str) -> String {
    match namespace {
        "" | "/" => String::new(),
        nsp if nsp.starts_with('/') => format!("{nsp},"),
        nsp => format!("/{nsp},"),
    }
}

fn connect_frame(prefix: &str) -> String {
    format!("40{prefix}")
}

fn event_frame(prefix: &str, event: &str, args: Vec<Value>) -> Result<String, TransportError> {
    let mut payload = Vec::with_capacity(args.len() + 1);
    payload.push(Value::String(event.to_string()));
    payload.extend(args);
    let body = serde_json::to_string(&payload).map_err(|e| TransportError::Send {
        error: e.to_string(),
    })?;
    Ok(format!("42{prefix}{body}"))
}
