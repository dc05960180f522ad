//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the built-in subscribers
//! for events published through the [`EventBus`](crate::EventBus).
//!
//! ## Architecture
//! ```text
//! InstrumentedStep ── Hooks ──► EventBus ──► on_event(&Event), in subscription order
//!                                               │
//!                                    ┌──────────┼──────────────┐
//!                                    ▼          ▼              ▼
//!                               LogWriter  TelemetryConnection  Custom
//! ```

mod subscribe;

#[cfg(feature = "logging")]
mod embedded;

pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
