//! # Instrumenter: hooked copies of a tree.
//!
//! [`Instrumenter::instrument`] mirrors the indexer's walk:
//!
//! ```text
//! instrument(node):
//!   Composite { args } with child nodes
//!       ├─► instrument every child (recursively)
//!       ├─► node.with_args(args with wrapped children)   ← rebuilt copy, tagged with node's identity
//!       └─► wrap the copy
//!   otherwise
//!       └─► wrap the node
//! ```
//!
//! A wrapped node starts an `InstrumentedStep` around the original step sequence:
//!
//! ```text
//! resume(input):
//!   first call ─► hooks.entered(id)                  (EventShape::EntryAndResult only)
//!   out = inner.resume(input)                         (input forwarded unchanged)
//!   out is Success | Failure | Running ─► hooks.produced(id, status)
//!   return out                                        (unchanged)
//! ```
//!
//! Step count, values and control order seen by the caller are exactly those of
//! the original tree. `Custom` signals and child calls are forwarded without
//! notification.

use std::sync::Arc;

use async_trait::async_trait;

use crate::nodes::{Arg, Enclosed, Node, NodeRef, Signal, Step, Yield};
use crate::tree::{IdentityMap, NodeId, Shape, classify};

use super::hooks::Hooks;

/// Notification shape of an instrumented tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EventShape {
    /// `entered` on the first resume, `produced` for every recognized status.
    #[default]
    EntryAndResult,
    /// Only `produced`, once per recognized status.
    ResultOnly,
}

/// Builds hooked copies of trees.
pub struct Instrumenter<'a> {
    ids: &'a IdentityMap,
    hooks: Arc<dyn Hooks>,
    shape: EventShape,
}

impl<'a> Instrumenter<'a> {
    /// Creates an instrumenter reporting ids from `ids` to `hooks`.
    pub fn new(ids: &'a IdentityMap, hooks: Arc<dyn Hooks>, shape: EventShape) -> Self {
        Self { ids, hooks, shape }
    }

    /// Returns a behaviorally equivalent copy of `root` that notifies the hooks.
    pub fn instrument(&self, root: &NodeRef) -> NodeRef {
        let id = self.ids.id_of(root);
        let inner = match classify(root) {
            Shape::Composite { args, .. } if args.iter().any(Arg::is_node) => {
                self.rebuild(root, args)
            }
            _ => root.clone(),
        };
        let wrapped = InstrumentedNode {
            inner,
            id,
            hooks: Arc::clone(&self.hooks),
            shape: self.shape,
        };
        NodeRef::derived(Arc::new(wrapped), root.identity())
    }

    fn rebuild(&self, node: &NodeRef, args: Vec<Arg>) -> NodeRef {
        let args = args
            .into_iter()
            .map(|arg| match arg {
                Arg::Node(child) => Arg::Node(self.instrument(&child)),
                other => other,
            })
            .collect();
        match node.node().with_args(args) {
            Some(rebuilt) => NodeRef::derived(rebuilt, node.identity()),
            None => {
                tracing::warn!(
                    node = node.name(),
                    id = %self.ids.id_of(node),
                    "node cannot be rebuilt; its children will not be instrumented"
                );
                node.clone()
            }
        }
    }
}

/// Node wrapper emitting notifications around the original step sequence.
struct InstrumentedNode {
    inner: NodeRef,
    id: NodeId,
    hooks: Arc<dyn Hooks>,
    shape: EventShape,
}

impl Node for InstrumentedNode {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn enclosed(&self) -> Vec<Enclosed> {
        self.inner.enclosed()
    }

    fn with_args(&self, args: Vec<Arg>) -> Option<Arc<dyn Node>> {
        let rebuilt = self.inner.node().with_args(args)?;
        Some(Arc::new(InstrumentedNode {
            inner: NodeRef::derived(rebuilt, self.inner.identity()),
            id: self.id.clone(),
            hooks: Arc::clone(&self.hooks),
            shape: self.shape,
        }))
    }

    fn start(&self) -> Box<dyn Step> {
        Box::new(InstrumentedStep {
            inner: self.inner.start(),
            id: self.id.clone(),
            hooks: Arc::clone(&self.hooks),
            shape: self.shape,
            entered: false,
        })
    }
}

/// Step sequence forwarding every exchange to the original one.
struct InstrumentedStep {
    inner: Box<dyn Step>,
    id: NodeId,
    hooks: Arc<dyn Hooks>,
    shape: EventShape,
    entered: bool,
}

#[async_trait]
impl Step for InstrumentedStep {
    async fn resume(&mut self, input: Option<Signal>) -> Option<Yield> {
        if !self.entered {
            self.entered = true;
            if self.shape == EventShape::EntryAndResult {
                self.hooks.entered(&self.id).await;
            }
        }
        let out = self.inner.resume(input).await;
        if let Some(status) = out.as_ref().and_then(Yield::signal).and_then(Signal::status) {
            self.hooks.produced(&self.id, status).await;
        }
        out
    }
}
