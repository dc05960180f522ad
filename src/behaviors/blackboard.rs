//! Shared key/value blackboard and the nodes that read and write it.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::nodes::{Arg, Enclosed, Node, NodeRef, Scalar, Signal, Step, Yield};

/// Cloneable shared map used by [`set_bb`] and [`check_bb`].
#[derive(Clone, Debug, Default)]
pub struct Blackboard {
    inner: Arc<Mutex<HashMap<String, Scalar>>>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `val` under `key`.
    pub fn set(&self, key: impl Into<String>, val: Scalar) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), val);
    }

    /// Returns a copy of the value under `key`.
    pub fn get(&self, key: &str) -> Option<Scalar> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

struct SetBb {
    board: Blackboard,
    key: String,
    val: Scalar,
}

impl Node for SetBb {
    fn name(&self) -> &str {
        "set_bb"
    }

    fn enclosed(&self) -> Vec<Enclosed> {
        let mut named = BTreeMap::new();
        named.insert("key".to_string(), Arg::Scalar(Scalar::Str(self.key.clone())));
        named.insert("val".to_string(), Arg::Scalar(self.val.clone()));
        vec![Enclosed::Map(named), Enclosed::Value(Arg::Opaque("blackboard"))]
    }

    fn start(&self) -> Box<dyn Step> {
        Box::new(SetBbStep {
            write: Some((self.board.clone(), self.key.clone(), self.val.clone())),
        })
    }
}

struct SetBbStep {
    write: Option<(Blackboard, String, Scalar)>,
}

#[async_trait]
impl Step for SetBbStep {
    async fn resume(&mut self, _input: Option<Signal>) -> Option<Yield> {
        let (board, key, val) = self.write.take()?;
        board.set(key, val);
        Some(Yield::Signal(Signal::Success))
    }
}

/// Writes `val` under `key` and succeeds.
pub fn set_bb(board: &Blackboard, key: impl Into<String>, val: impl Into<Scalar>) -> NodeRef {
    NodeRef::new(SetBb {
        board: board.clone(),
        key: key.into(),
        val: val.into(),
    })
}

type Predicate = Arc<dyn Fn(Option<&Scalar>) -> bool + Send + Sync>;

struct CheckBb {
    board: Blackboard,
    key: String,
    check: Predicate,
}

impl Node for CheckBb {
    fn name(&self) -> &str {
        "check_bb"
    }

    fn enclosed(&self) -> Vec<Enclosed> {
        let mut named = BTreeMap::new();
        named.insert("key".to_string(), Arg::Scalar(Scalar::Str(self.key.clone())));
        named.insert("check".to_string(), Arg::Opaque("predicate"));
        vec![Enclosed::Map(named), Enclosed::Value(Arg::Opaque("blackboard"))]
    }

    fn start(&self) -> Box<dyn Step> {
        Box::new(CheckBbStep {
            board: self.board.clone(),
            key: self.key.clone(),
            check: Arc::clone(&self.check),
            done: false,
        })
    }
}

struct CheckBbStep {
    board: Blackboard,
    key: String,
    check: Predicate,
    done: bool,
}

#[async_trait]
impl Step for CheckBbStep {
    async fn resume(&mut self, _input: Option<Signal>) -> Option<Yield> {
        if std::mem::replace(&mut self.done, true) {
            return None;
        }
        let value = self.board.get(&self.key);
        let signal = if (self.check)(value.as_ref()) {
            Signal::Success
        } else {
            Signal::Failure
        };
        Some(Yield::Signal(signal))
    }
}

/// Succeeds if `check` accepts the value under `key`.
pub fn check_bb<F>(board: &Blackboard, key: impl Into<String>, check: F) -> NodeRef
where
    F: Fn(Option<&Scalar>) -> bool + Send + Sync + 'static,
{
    NodeRef::new(CheckBb {
        board: board.clone(),
        key: key.into(),
        check: Arc::new(check),
    })
}
