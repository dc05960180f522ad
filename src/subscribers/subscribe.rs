//! # Event subscriber trait.
//!
//! Provides [`Subscribe`], the extension point for plugging handlers into an
//! [`EventBus`](crate::EventBus).
//!
//! ## Rules
//! - `on_event` runs inline with `publish`; a slow subscriber stalls the tree.
//! - Panics are caught by the bus and logged; other subscribers still run.
//! - Events arrive in emission order.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use treewatch::{Event, EventKind, Status, Subscribe};
//!
//! struct Failures;
//!
//! #[async_trait]
//! impl Subscribe for Failures {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::Produced(Status::Failure) {
//!             // count, alert, etc.
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "failures" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Event subscriber for tree observability.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
