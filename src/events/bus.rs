//! # Ordered multicast bus for tree events.
//!
//! [`EventBus`] delivers every published event to each current subscriber, in
//! subscription order, before `publish` returns.
//!
//! ## Architecture
//! ```text
//! InstrumentedStep ──► Hooks::entered / produced
//!                            │
//!                            ▼
//!                      EventBus::publish(ev)
//!                            │  snapshot of subscribers (lock released)
//!                            ├──► sub1.on_event(&ev).await   ─┐
//!                            ├──► sub2.on_event(&ev).await    ├─ panics caught, logged, skipped
//!                            └──► subN.on_event(&ev).await   ─┘
//! ```
//!
//! ## Rules
//! - **Synchronous delivery**: `publish` awaits every subscriber in turn; a slow
//!   subscriber stalls the caller (and therefore tree execution).
//! - **Subscription order**: subscribers see events in the order they subscribed.
//! - **Panic isolation**: a panicking subscriber is logged with `tracing::warn!`
//!   and delivery continues with the next one.
//! - **Snapshot semantics**: subscribe/unsubscribe during a publish affect the
//!   next publish, not the current one.
//! - **No persistence**: events published with no subscribers are dropped.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use futures::FutureExt;

use crate::instrument::Hooks;
use crate::nodes::Status;
use crate::subscribers::Subscribe;
use crate::tree::NodeId;

use super::event::Event;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered, synchronous multicast of [`Event`]s.
#[derive(Default)]
pub struct EventBus {
    subs: RwLock<Vec<(SubscriptionId, Arc<dyn Subscribe>)>>,
    next_id: AtomicU64,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a subscriber; it receives every event published from now on.
    pub fn subscribe(&self, sub: Arc<dyn Subscribe>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, AtomicOrdering::Relaxed));
        self.subs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, sub));
        id
    }

    /// Removes a subscriber. Returns `false` if the id was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subs.write().unwrap_or_else(PoisonError::into_inner);
        let before = subs.len();
        subs.retain(|(sid, _)| *sid != id);
        subs.len() != before
    }

    /// Number of current subscribers.
    pub fn len(&self) -> usize {
        self.subs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers `ev` to every current subscriber, in subscription order.
    pub async fn publish(&self, ev: Event) {
        let snapshot: Vec<Arc<dyn Subscribe>> = self
            .subs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, sub)| Arc::clone(sub))
            .collect();

        for sub in snapshot {
            let fut = sub.on_event(&ev);
            if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                let info = {
                    let any = &*panic_err;
                    if let Some(msg) = any.downcast_ref::<&'static str>() {
                        (*msg).to_string()
                    } else if let Some(msg) = any.downcast_ref::<String>() {
                        msg.clone()
                    } else {
                        "unknown panic".to_string()
                    }
                };
                tracing::warn!(
                    subscriber = sub.name(),
                    seq = ev.seq,
                    panic = %info,
                    "subscriber panicked; continuing delivery"
                );
            }
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.len())
            .finish()
    }
}

#[async_trait]
impl Hooks for EventBus {
    async fn entered(&self, id: &NodeId) {
        self.publish(Event::entered(id.clone())).await;
    }

    async fn produced(&self, id: &NodeId, status: Status) {
        self.publish(Event::produced(id.clone(), status)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::nodes::NodeKey;
    use std::sync::Mutex;

    struct Recorder {
        tag: &'static str,
        log: Arc<Mutex<Vec<(&'static str, u64)>>>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, ev: &Event) {
            self.log.lock().unwrap().push((self.tag, ev.seq));
        }

        fn name(&self) -> &'static str {
            self.tag
        }
    }

    struct Panicker;

    #[async_trait]
    impl Subscribe for Panicker {
        async fn on_event(&self, _ev: &Event) {
            panic!("boom");
        }
    }

    fn id(n: u64) -> NodeId {
        NodeId::from_key(NodeKey::from(n))
    }

    #[tokio::test]
    async fn test_delivers_in_subscription_order() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for tag in ["a", "b", "c"] {
            bus.subscribe(Arc::new(Recorder {
                tag,
                log: Arc::clone(&log),
            }));
        }

        let ev = Event::entered(id(1));
        let seq = ev.seq;
        bus.publish(ev).await;

        assert_eq!(*log.lock().unwrap(), vec![("a", seq), ("b", seq), ("c", seq)]);
    }

    #[tokio::test]
    async fn test_panicking_subscriber_is_isolated() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(Arc::new(Panicker));
        bus.subscribe(Arc::new(Recorder {
            tag: "after",
            log: Arc::clone(&log),
        }));

        bus.publish(Event::entered(id(1))).await;
        bus.publish(Event::entered(id(2))).await;

        assert_eq!(log.lock().unwrap().len(), 2);
        assert_eq!(bus.len(), 2);
    }

    #[tokio::test]
    async fn test_unsubscribe() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let sid = bus.subscribe(Arc::new(Recorder {
            tag: "x",
            log: Arc::clone(&log),
        }));

        assert!(bus.unsubscribe(sid));
        assert!(!bus.unsubscribe(sid));
        assert!(bus.is_empty());

        bus.publish(Event::entered(id(1))).await;
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hooks_publish_events() {
        struct Kinds(Arc<Mutex<Vec<EventKind>>>);

        #[async_trait]
        impl Subscribe for Kinds {
            async fn on_event(&self, ev: &Event) {
                self.0.lock().unwrap().push(ev.kind);
            }
        }

        let bus = EventBus::new();
        let kinds = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(Arc::new(Kinds(Arc::clone(&kinds))));

        let hooks: &dyn Hooks = &bus;
        hooks.entered(&id(3)).await;
        hooks.produced(&id(3), Status::Running).await;

        assert_eq!(
            *kinds.lock().unwrap(),
            vec![EventKind::Entered, EventKind::Produced(Status::Running)]
        );
    }
}
