//! Reconnect delay policies.
//!
//! These control **how long** a [`TelemetryConnection`](crate::TelemetryConnection)
//! waits between failed attempts to reach the collector.
//!
//! ## Contents
//! - [`BackoffPolicy`] how delays evolve (first / factor / max + jitter)
//! - [`JitterPolicy`]  randomization of each delay
//!
//! ## Quick wiring
//! ```text
//! ConnectionConfig { reconnect: BackoffPolicy, max_attempts, .. }
//!      └─► TelemetryConnection::reconnect:
//!           for attempt in 0..max_attempts {
//!               open() ok  ─► introduce, done
//!               open() err ─► sleep(reconnect.next(attempt)) (cancelled by close())
//!           }
//! ```
//!
//! ## Defaults
//! - `BackoffPolicy::default()` → first=500ms, factor=2.0, max=10s, jitter=Equal.
//! - `JitterPolicy::None` when constructed directly.

mod backoff;
mod jitter;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
