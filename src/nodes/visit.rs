//! # Trampolining driver for step sequences.
//!
//! [`Visit`] keeps an explicit stack of running step sequences instead of
//! recursing: composite nodes hand their children out as [`Yield::Call`], the
//! driver pushes them, and when a child is exhausted its last signal is sent
//! into the parent.
//!
//! ```text
//! next():
//!   loop {
//!     top = stack.last()
//!     match top.resume(pending)
//!       Call(child)  ─► push child
//!       Signal(s)    ─► pending = s, return s
//!       None         ─► pop, pending is sent into the parent
//!   }
//! ```

use tokio_util::sync::CancellationToken;

use super::node::NodeRef;
use super::step::{Signal, Step, Yield};

/// Drives a tree one signal at a time.
pub struct Visit {
    stack: Vec<Box<dyn Step>>,
    pending: Option<Signal>,
}

impl Visit {
    /// Starts a new step sequence for `root`.
    pub fn new(root: &NodeRef) -> Self {
        Self {
            stack: vec![root.start()],
            pending: None,
        }
    }

    /// Runs until any step in the tree yields a signal.
    ///
    /// Returns `None` once the root sequence is exhausted.
    pub async fn next(&mut self) -> Option<Signal> {
        loop {
            let top = self.stack.last_mut()?;
            let input = self.pending.take();
            match top.resume(input.clone()).await {
                Some(Yield::Call(child)) => self.stack.push(child),
                Some(Yield::Signal(signal)) => {
                    self.pending = Some(signal.clone());
                    return Some(signal);
                }
                None => {
                    self.stack.pop();
                    self.pending = input;
                }
            }
        }
    }

    /// Number of step sequences currently on the stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Drives `root` to completion, or until `ctx` is cancelled.
///
/// Returns every signal in the order it was produced.
pub async fn visit_all(root: &NodeRef, ctx: &CancellationToken) -> Vec<Signal> {
    let mut visit = Visit::new(root);
    let mut out = Vec::new();
    while !ctx.is_cancelled() {
        match visit.next().await {
            Some(signal) => out.push(signal),
            None => break,
        }
    }
    out
}
