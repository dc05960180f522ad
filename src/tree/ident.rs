//! # Display ids for indexed nodes.
//!
//! A [`NodeId`] is the short printable token a node is known by in the
//! structure descriptor and in every event. It is the base-52 encoding
//! (`a–z`, `A–Z`, most significant digit first) of the node's
//! [`NodeKey`]; the encoding is injective, so distinct keys never collide.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::nodes::{NodeKey, NodeRef};

const ALPHABET: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Printable, cheap-to-clone node id.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Arc<str>);

impl NodeId {
    /// Encodes a node key.
    pub fn from_key(key: NodeKey) -> Self {
        Self(encode(key.get()).into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn encode(mut n: u64) -> String {
    let base = ALPHABET.len() as u64;
    let mut digits = Vec::new();
    loop {
        digits.push(ALPHABET[(n % base) as usize]);
        n /= base;
        if n == 0 {
            break;
        }
    }
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Node identity → display id, built once by the indexer.
///
/// Lookups go through [`NodeRef::identity`], so rebuilt copies of a node
/// resolve to the id of the node they originated from.
#[derive(Clone, Debug, Default)]
pub struct IdentityMap {
    ids: HashMap<NodeKey, NodeId>,
}

impl IdentityMap {
    /// Assigns an id on first visit; later visits return the same id.
    pub(crate) fn assign(&mut self, node: &NodeRef) -> NodeId {
        self.ids
            .entry(node.identity())
            .or_insert_with(|| NodeId::from_key(node.identity()))
            .clone()
    }

    /// Id of `node`, if it was indexed.
    pub fn get(&self, node: &NodeRef) -> Option<&NodeId> {
        self.ids.get(&node.identity())
    }

    /// Id of `node`, falling back to encoding its identity directly.
    pub fn id_of(&self, node: &NodeRef) -> NodeId {
        self.get(node)
            .cloned()
            .unwrap_or_else(|| NodeId::from_key(node.identity()))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
