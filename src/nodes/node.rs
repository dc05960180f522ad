//! # Nodes and their enclosed values.
//!
//! A [`Node`] is an opaque unit of tree behavior supplied by a node library.
//! The watcher never looks at how a node behaves; it only reads what the node
//! *encloses* through [`Node::enclosed`]:
//!
//! - [`Enclosed::Seq`] a sequence-typed collection (the construction argument list);
//! - [`Enclosed::Map`] a mapping-typed collection (named arguments);
//! - [`Enclosed::Value`] anything else the node holds on to.
//!
//! Shape detection over these values is a structural heuristic, not a contract
//! declared by the node library: see [`classify`](crate::tree::classify).
//!
//! ## Identity
//! Every [`NodeRef`] created with [`NodeRef::new`] draws a fresh [`NodeKey`] from a
//! process-wide counter. Clones of a handle share the key, so the same node object
//! always reports the same identity while two structurally identical nodes never do.
//! Rebuilt copies carry the key of the node they originated from
//! (see [`NodeRef::identity`]).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use super::step::Step;

/// Global counter for node identity tokens.
static NODE_SEQ: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity token of a node handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(u64);

impl NodeKey {
    fn next() -> Self {
        Self(NODE_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Returns the raw numeric value of the token.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for NodeKey {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Scalar parameter attached to a node.
///
/// Only these kinds contribute to a node's description.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Explicitly absent value (`None`-like).
    Absent,
}

impl Scalar {
    /// Renders the value, or `None` for [`Scalar::Absent`].
    pub fn render(&self) -> Option<String> {
        match self {
            Scalar::Str(s) => Some(s.clone()),
            Scalar::Int(i) => Some(i.to_string()),
            Scalar::Float(f) => Some(format!("{f:?}")),
            Scalar::Bool(true) => Some("True".to_string()),
            Scalar::Bool(false) => Some("False".to_string()),
            Scalar::Absent => None,
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Int(i64::from(i))
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Float(f)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map_or(Scalar::Absent, Into::into)
    }
}

/// One element of an enclosed collection.
#[derive(Clone, Debug)]
pub enum Arg {
    /// Descriptive scalar parameter.
    Scalar(Scalar),
    /// Executable child node.
    Node(NodeRef),
    /// Any other value (callables, handles); ignored for description.
    Opaque(&'static str),
}

impl Arg {
    #[inline]
    pub fn is_node(&self) -> bool {
        matches!(self, Arg::Node(_))
    }

    #[inline]
    pub fn as_node(&self) -> Option<&NodeRef> {
        match self {
            Arg::Node(n) => Some(n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Arg::Scalar(s) => Some(s),
            _ => None,
        }
    }
}

impl From<NodeRef> for Arg {
    fn from(node: NodeRef) -> Self {
        Arg::Node(node)
    }
}

impl From<Scalar> for Arg {
    fn from(s: Scalar) -> Self {
        Arg::Scalar(s)
    }
}

/// A value enclosed by a node, as exposed for introspection.
#[derive(Clone, Debug)]
pub enum Enclosed {
    /// Ordered sequence (construction argument list).
    Seq(Vec<Arg>),
    /// Named arguments.
    Map(BTreeMap<String, Arg>),
    /// Any other enclosed value.
    Value(Arg),
}

/// # Opaque unit of tree behavior.
///
/// Implemented by node libraries. The watcher reads [`enclosed`](Node::enclosed),
/// rebuilds through [`with_args`](Node::with_args) and drives [`start`](Node::start);
/// it never mutates a node.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use treewatch::{Node, NodeRef, Signal, Step, Yield};
///
/// struct Ping;
/// struct PingStep { done: bool }
///
/// #[async_trait]
/// impl Step for PingStep {
///     async fn resume(&mut self, _input: Option<Signal>) -> Option<Yield> {
///         if std::mem::replace(&mut self.done, true) {
///             return None;
///         }
///         Some(Yield::Signal(Signal::Success))
///     }
/// }
///
/// impl Node for Ping {
///     fn name(&self) -> &str { "ping" }
///     fn start(&self) -> Box<dyn Step> { Box::new(PingStep { done: false }) }
/// }
///
/// let node = NodeRef::new(Ping);
/// assert_eq!(node.name(), "ping");
/// ```
pub trait Node: Send + Sync + 'static {
    /// Display name of the node kind.
    fn name(&self) -> &str;

    /// Values enclosed by the node. Default: nothing.
    fn enclosed(&self) -> Vec<Enclosed> {
        Vec::new()
    }

    /// Builds a node of the same kind whose sequence collection is replaced by `args`.
    ///
    /// Returns `None` when the node cannot be rebuilt (default).
    fn with_args(&self, _args: Vec<Arg>) -> Option<Arc<dyn Node>> {
        None
    }

    /// Begins a new step sequence.
    fn start(&self) -> Box<dyn Step>;
}

/// Shared handle to a node with a stable identity.
#[derive(Clone)]
pub struct NodeRef {
    key: NodeKey,
    origin: Option<NodeKey>,
    node: Arc<dyn Node>,
}

impl NodeRef {
    /// Wraps a node and assigns it a fresh identity.
    pub fn new(node: impl Node) -> Self {
        Self::from_arc(Arc::new(node))
    }

    /// Wraps a shared node and assigns it a fresh identity.
    pub fn from_arc(node: Arc<dyn Node>) -> Self {
        Self {
            key: NodeKey::next(),
            origin: None,
            node,
        }
    }

    /// Wraps a node rebuilt from the node identified by `origin`.
    pub(crate) fn derived(node: Arc<dyn Node>, origin: NodeKey) -> Self {
        Self {
            key: NodeKey::next(),
            origin: Some(origin),
            node,
        }
    }

    /// Identity of this very handle.
    #[inline]
    pub fn key(&self) -> NodeKey {
        self.key
    }

    /// Identity this node reports: the originating node's key for rebuilt
    /// copies, otherwise [`key`](Self::key).
    #[inline]
    pub fn identity(&self) -> NodeKey {
        self.origin.unwrap_or(self.key)
    }

    /// True if this handle is a rebuilt copy of another node.
    #[inline]
    pub fn is_derived(&self) -> bool {
        self.origin.is_some()
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.node.name()
    }

    #[inline]
    pub fn enclosed(&self) -> Vec<Enclosed> {
        self.node.enclosed()
    }

    #[inline]
    pub fn start(&self) -> Box<dyn Step> {
        self.node.start()
    }

    /// Access to the underlying node.
    #[inline]
    pub fn node(&self) -> &Arc<dyn Node> {
        &self.node
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("name", &self.name())
            .field("key", &self.key)
            .field("origin", &self.origin)
            .finish()
    }
}
