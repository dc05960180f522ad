//! # Instrumentation hooks.
//!
//! [`Hooks`] receives the two notifications an instrumented node emits.
//! [`EventBus`](crate::EventBus) implements it, so a bus can be handed to the
//! [`Instrumenter`](super::Instrumenter) as is. [`HookFn`] adapts plain closures.
//!
//! Hooks run inline with the `resume` call that triggers them; a slow hook
//! stalls tree execution.

use async_trait::async_trait;

use crate::nodes::Status;
use crate::tree::NodeId;

/// Receiver of instrumentation notifications.
#[async_trait]
pub trait Hooks: Send + Sync + 'static {
    /// A node's step sequence started (first resume).
    async fn entered(&self, id: &NodeId);

    /// A node's step sequence yielded a recognized status to its caller.
    async fn produced(&self, id: &NodeId, status: Status);
}

/// Closure-backed [`Hooks`].
///
/// ## Example
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use treewatch::{HookFn, NodeId, Status};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let s = Arc::clone(&seen);
/// let hooks = HookFn::new(
///     move |id: &NodeId| s.lock().unwrap().push(id.to_string()),
///     |_id: &NodeId, _status: Status| {},
/// );
/// # let _ = hooks;
/// ```
pub struct HookFn<E, P> {
    on_entered: E,
    on_produced: P,
}

impl<E, P> HookFn<E, P>
where
    E: Fn(&NodeId) + Send + Sync + 'static,
    P: Fn(&NodeId, Status) + Send + Sync + 'static,
{
    pub fn new(on_entered: E, on_produced: P) -> Self {
        Self {
            on_entered,
            on_produced,
        }
    }
}

#[async_trait]
impl<E, P> Hooks for HookFn<E, P>
where
    E: Fn(&NodeId) + Send + Sync + 'static,
    P: Fn(&NodeId, Status) + Send + Sync + 'static,
{
    async fn entered(&self, id: &NodeId) {
        (self.on_entered)(id);
    }

    async fn produced(&self, id: &NodeId, status: Status) {
        (self.on_produced)(id, status);
    }
}
