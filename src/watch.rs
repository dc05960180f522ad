//! # TreeWatch: one watched tree instance.
//!
//! [`TreeWatch`] owns everything built for a single root node:
//!
//! ```text
//! TreeWatch::new(root)
//!   ├─► TreeIndexer::index  ─► ParsedTree, IdentityMap, StructureDescriptor  (once, read-only)
//!   ├─► EventBus                                                             (owned, not global)
//!   ├─► tree_with_hooks()   ─► Instrumenter(ids, bus).instrument(root)       (lazy, once)
//!   └─► connect(conn)       ─► conn.set_introduction(structure); bus.subscribe(conn)   (once)
//! ```
//!
//! Drive [`TreeWatch::tree_with_hooks`] exactly as you would drive the root;
//! events reach subscribers as a side effect.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tokio_util::sync::CancellationToken;

use crate::config::WatchConfig;
use crate::error::WatchError;
use crate::events::{EventBus, SubscriptionId};
use crate::instrument::{Hooks, Instrumenter};
use crate::nodes::{NodeRef, Signal, visit_all};
use crate::subscribers::Subscribe;
use crate::telemetry::TelemetryConnection;
use crate::tree::{IdentityMap, ParsedTree, StructureDescriptor, TreeIndexer};

/// A root node together with its index, bus and hooked copy.
pub struct TreeWatch {
    root: NodeRef,
    config: WatchConfig,
    parsed: ParsedTree,
    ids: IdentityMap,
    structure: StructureDescriptor,
    bus: Arc<EventBus>,
    hooked: OnceLock<NodeRef>,
    connected: AtomicBool,
}

impl TreeWatch {
    /// Indexes `root` with the default configuration.
    pub fn new(root: NodeRef) -> Self {
        Self::with_config(root, WatchConfig::default())
    }

    /// Indexes `root` once; the structure and ids are fixed afterwards.
    pub fn with_config(root: NodeRef, config: WatchConfig) -> Self {
        let indexer = TreeIndexer::new(config.absent.clone());
        let (parsed, ids) = indexer.index(&root);
        let structure = indexer.structure(&parsed, &ids);
        tracing::debug!(
            root = root.name(),
            nodes = parsed.len(),
            "tree indexed"
        );
        Self {
            root,
            config,
            parsed,
            ids,
            structure,
            bus: Arc::new(EventBus::new()),
            hooked: OnceLock::new(),
            connected: AtomicBool::new(false),
        }
    }

    /// The original, uninstrumented root.
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Cached display structure.
    pub fn structure(&self) -> &StructureDescriptor {
        &self.structure
    }

    pub fn parsed(&self) -> &ParsedTree {
        &self.parsed
    }

    pub fn identities(&self) -> &IdentityMap {
        &self.ids
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Adds a subscriber to this tree's bus.
    pub fn subscribe(&self, sub: Arc<dyn Subscribe>) -> SubscriptionId {
        self.bus.subscribe(sub)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Instrumented copy of the root, built on first use.
    pub fn tree_with_hooks(&self) -> &NodeRef {
        self.hooked.get_or_init(|| {
            let hooks: Arc<dyn Hooks> = Arc::clone(&self.bus) as Arc<dyn Hooks>;
            Instrumenter::new(&self.ids, hooks, self.config.events).instrument(&self.root)
        })
    }

    /// Drives the instrumented tree to completion, returning every signal in order.
    pub async fn run(&self, ctx: &CancellationToken) -> Vec<Signal> {
        visit_all(self.tree_with_hooks(), ctx).await
    }

    /// Introduces the tree to `conn` and subscribes it to the bus.
    ///
    /// A second call fails with [`WatchError::AlreadyConnected`] and leaves the
    /// subscriptions untouched.
    pub async fn connect(
        &self,
        conn: TelemetryConnection,
    ) -> Result<Arc<TelemetryConnection>, WatchError> {
        if self.connected.swap(true, Ordering::SeqCst) {
            return Err(WatchError::AlreadyConnected);
        }
        if let Err(e) = conn.set_introduction(&self.structure).await {
            self.connected.store(false, Ordering::SeqCst);
            return Err(e);
        }
        let conn = Arc::new(conn);
        self.bus.subscribe(Arc::clone(&conn) as Arc<dyn Subscribe>);
        Ok(conn)
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for TreeWatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeWatch")
            .field("root", &self.root)
            .field("nodes", &self.parsed.len())
            .field("subscribers", &self.bus.len())
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviors::{fail, sequence, succeed};
    use crate::events::{Event, EventKind};
    use crate::instrument::EventShape;
    use crate::nodes::Status;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Kinds(Arc<Mutex<Vec<EventKind>>>);

    #[async_trait]
    impl Subscribe for Kinds {
        async fn on_event(&self, ev: &Event) {
            self.0.lock().unwrap().push(ev.kind);
        }
    }

    #[tokio::test]
    async fn test_hooked_tree_is_built_once() {
        let watch = TreeWatch::new(sequence([succeed()]));
        let a = watch.tree_with_hooks().key();
        let b = watch.tree_with_hooks().key();
        assert_eq!(a, b);
        assert_eq!(watch.tree_with_hooks().identity(), watch.root().identity());
    }

    #[tokio::test]
    async fn test_run_publishes_to_subscribers() {
        let watch = TreeWatch::new(sequence([succeed(), fail()]));
        let kinds = Arc::new(Mutex::new(Vec::new()));
        watch.subscribe(Arc::new(Kinds(Arc::clone(&kinds))));

        let out = watch.run(&CancellationToken::new()).await;
        assert_eq!(out, vec![Signal::Success, Signal::Failure, Signal::Failure]);

        let produced: Vec<_> = kinds
            .lock()
            .unwrap()
            .iter()
            .filter(|k| matches!(k, EventKind::Produced(_)))
            .copied()
            .collect();
        assert_eq!(
            produced,
            vec![
                EventKind::Produced(Status::Success),
                EventKind::Produced(Status::Failure),
                EventKind::Produced(Status::Failure),
            ]
        );
    }

    #[tokio::test]
    async fn test_result_only_config() {
        let cfg = WatchConfig {
            events: EventShape::ResultOnly,
            ..WatchConfig::default()
        };
        let watch = TreeWatch::with_config(sequence([succeed()]), cfg);
        let kinds = Arc::new(Mutex::new(Vec::new()));
        watch.subscribe(Arc::new(Kinds(Arc::clone(&kinds))));
        watch.run(&CancellationToken::new()).await;

        assert!(!kinds.lock().unwrap().contains(&EventKind::Entered));
    }

    #[test]
    fn test_structure_matches_identities() {
        let watch = TreeWatch::new(sequence([succeed(), succeed()]));
        assert_eq!(watch.structure().id, watch.identities().id_of(watch.root()));
        assert_eq!(watch.parsed().len(), 3);
    }
}
