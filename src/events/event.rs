//! # Tree events published by instrumented nodes.
//!
//! [`EventKind`] has two variants:
//! - [`EventKind::Entered`] a node's step sequence started;
//! - [`EventKind::Produced`] a node's step sequence yielded a recognized status.
//!
//! Every [`Event`] carries a global sequence number (`seq`) that increases
//! monotonically across the process, and a wall-clock timestamp for logs.
//!
//! ## Example
//! ```rust
//! use treewatch::{Event, EventKind, NodeId, NodeKey, Status};
//!
//! let id = NodeId::from_key(NodeKey::from(7));
//! let ev = Event::produced(id.clone(), Status::Failure);
//!
//! assert_eq!(ev.kind, EventKind::Produced(Status::Failure));
//! assert_eq!(ev.id, id);
//! assert_eq!(ev.status(), Some(Status::Failure));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::nodes::Status;
use crate::tree::NodeId;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of tree events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Step sequence started (first resume of the node).
    Entered,

    /// Step sequence yielded `Success`, `Failure` or `Running` to its caller.
    Produced(Status),
}

impl EventKind {
    /// Returns a short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::Entered => "entered",
            EventKind::Produced(_) => "produced",
        }
    }
}

/// Tree event tagged with the node's display id.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Id the indexer assigned to the originating node.
    pub id: NodeId,
    /// Event classification.
    pub kind: EventKind,
}

impl Event {
    /// Creates a new event with current timestamp and next sequence number.
    pub fn new(id: NodeId, kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            id,
            kind,
        }
    }

    #[inline]
    pub fn entered(id: NodeId) -> Self {
        Self::new(id, EventKind::Entered)
    }

    #[inline]
    pub fn produced(id: NodeId, status: Status) -> Self {
        Self::new(id, EventKind::Produced(status))
    }

    /// Status carried by a `Produced` event.
    #[inline]
    pub fn status(&self) -> Option<Status> {
        match self.kind {
            EventKind::Produced(s) => Some(s),
            EventKind::Entered => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::NodeKey;

    #[test]
    fn test_seq_is_monotonic() {
        let id = NodeId::from_key(NodeKey::from(1));
        let a = Event::entered(id.clone());
        let b = Event::produced(id, Status::Success);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_entered_has_no_status() {
        let ev = Event::entered(NodeId::from_key(NodeKey::from(2)));
        assert_eq!(ev.status(), None);
        assert_eq!(ev.kind.as_label(), "entered");
    }
}
