//! # treewatch
//!
//! **treewatch** instruments trees of opaque, stateful behavior nodes so that a
//! remote observer can watch, live, which node is executing and what each node
//! last produced.
//!
//! It reconstructs the tree's shape from the nodes' enclosed values, builds a
//! behaviorally identical copy that emits lifecycle events, and streams those
//! events to a collector over a best-effort, reconnecting channel.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!      ┌──────────────────────────┐
//!      │  root: NodeRef           │   (external behavior library, any Node impl)
//!      └────────────┬─────────────┘
//!                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  TreeWatch                                                        │
//! │  - TreeIndexer  (classify ─► ParsedTree, IdentityMap, Structure)  │
//! │  - Instrumenter (hooked copy, same ids)                           │
//! │  - EventBus     (ordered multicast, owned per tree)               │
//! └──────┬─────────────────────────────────────────┬──────────────────┘
//!        │ tree_with_hooks()                       │ connect(conn)
//!        ▼                                         ▼
//!   ┌──────────────┐   Hooks::entered/produced ┌──────────────────────┐
//!   │ Visit driver │ ────────► EventBus ─────► │ TelemetryConnection  │ ─► introduce / step
//!   │ (resume loop)│               │           └──────────────────────┘      (Socket.IO)
//!   └──────────────┘               ├─────────► LogWriter (feature "logging")
//!                                  └─────────► custom Subscribe
//! ```
//!
//! ### Step protocol
//! ```text
//! driver ──resume(input)──► InstrumentedStep ──resume(input)──► original Step
//!        ◄──── out ──────── (entered once, produced on S/F/R) ◄──── out ──────
//! ```
//!
//! ## Features
//! | Area                | Description                                                     | Key types / traits                        |
//! |---------------------|-----------------------------------------------------------------|-------------------------------------------|
//! | **Node contract**   | Enclosed values, rebuild with new args, resumable steps.        | [`Node`], [`Step`], [`NodeRef`]           |
//! | **Discovery**       | Composite/leaf heuristic, parsed tree, stable ids.              | [`classify`], [`TreeIndexer`], [`NodeId`] |
//! | **Instrumentation** | Hooked copies with unchanged results.                           | [`Instrumenter`], [`Hooks`]               |
//! | **Events**          | Ordered multicast with panic isolation.                         | [`EventBus`], [`Subscribe`]               |
//! | **Telemetry**       | Introduce/step messages, inactivity reconnect, bounded retries. | [`TelemetryConnection`], [`Connector`]    |
//! | **Errors**          | Typed usage and transport errors.                               | [`WatchError`], [`TransportError`]        |
//! | **Configuration**   | Event shape, absent-parameter text, connection knobs.           | [`WatchConfig`], [`ConnectionConfig`]     |
//!
//! ## Optional features
//! - `socketio` (default): exports [`SocketIoConnector`] and [`TelemetryConnection::socketio`].
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use treewatch::{TreeWatch, behaviors::{fail, sequence, succeed}};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let watch = TreeWatch::new(sequence([succeed(), fail()]));
//!
//!     #[cfg(feature = "logging")]
//!     watch.subscribe(std::sync::Arc::new(treewatch::LogWriter::new()));
//!
//!     // `watch.connect(TelemetryConnection::socketio(cfg)).await?` streams to a collector.
//!     let signals = watch.run(&CancellationToken::new()).await;
//!     assert_eq!(signals.len(), 3);
//!     assert_eq!(watch.structure().children.len(), 2);
//! }
//! ```
pub mod behaviors;
mod config;
mod error;
mod events;
mod instrument;
mod nodes;
mod policies;
mod subscribers;
mod telemetry;
mod tree;
mod watch;

// ---- Public re-exports ----

pub use config::{AbsentParams, WatchConfig};
pub use error::{TransportError, WatchError};
pub use events::{Event, EventBus, EventKind, SubscriptionId};
pub use instrument::{EventShape, HookFn, Hooks, Instrumenter};
pub use nodes::{
    Arg, Enclosed, Node, NodeKey, NodeRef, Scalar, Signal, Status, Step, Visit, Yield, visit_all,
};
pub use policies::{BackoffPolicy, JitterPolicy};
pub use subscribers::Subscribe;
pub use telemetry::{
    Channel, ConnectionConfig, Connector, TelemetryConnection, default_room_name, sanitize_room,
};
pub use tree::{
    Detail, IdentityMap, NodeId, Params, ParsedTree, Shape, StructureDescriptor, TreeIndexer,
    classify,
};
pub use watch::TreeWatch;

// Socket.IO collector transport.
// Enabled by default; disable with `--no-default-features`.
#[cfg(feature = "socketio")]
pub use telemetry::SocketIoConnector;

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
