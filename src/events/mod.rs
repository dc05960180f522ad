//! Tree events: types and the ordered in-process bus.
//!
//! This module groups the event **data model** and the **bus** that fans
//! events out to subscribers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and metadata
//! - [`EventBus`], [`SubscriptionId`] ordered multicast with panic isolation
//!
//! ## Quick reference
//! - **Publisher**: instrumented nodes, through the [`Hooks`](crate::Hooks)
//!   implementation on [`EventBus`].
//! - **Consumers**: any [`Subscribe`](crate::Subscribe) implementation, e.g.
//!   [`TelemetryConnection`](crate::TelemetryConnection).

mod bus;
mod event;

pub use bus::{EventBus, SubscriptionId};
pub use event::{Event, EventKind};
