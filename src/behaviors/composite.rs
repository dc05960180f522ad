//! Composite behaviors: sequence, selector, parallel and repeaters.
//!
//! Children are handed to the driver as [`Yield::Call`]; the child's last
//! signal comes back as the next `resume` input.

use std::sync::Arc;

use async_trait::async_trait;

use crate::nodes::{Arg, Enclosed, Node, NodeRef, Signal, Step, Yield};

/// Control-flow kind of a [`Composite`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeKind {
    /// Runs children in order; stops at the first failure.
    Sequence,
    /// Runs children in order; stops at the first success.
    Selector,
    /// Runs every child; succeeds only if all of them succeed.
    Parallel,
    /// Reruns its child forever.
    RepeatAlways,
    /// Reruns its child until it fails.
    RepeatUntilFail,
    /// Reruns its child until it succeeds.
    RepeatUntilSucceed,
}

impl CompositeKind {
    fn name(self) -> &'static str {
        match self {
            CompositeKind::Sequence => "sequence",
            CompositeKind::Selector => "selector",
            CompositeKind::Parallel => "parallel",
            CompositeKind::RepeatAlways => "repeat_always",
            CompositeKind::RepeatUntilFail => "repeat_until_fail",
            CompositeKind::RepeatUntilSucceed => "repeat_until_succeed",
        }
    }
}

/// Node whose construction argument list holds its children.
pub struct Composite {
    kind: CompositeKind,
    args: Vec<Arg>,
}

impl Composite {
    /// Builds a composite from a full argument list (children and scalars).
    pub fn new(kind: CompositeKind, args: Vec<Arg>) -> Self {
        Self { kind, args }
    }

    fn children(&self) -> Vec<NodeRef> {
        self.args.iter().filter_map(Arg::as_node).cloned().collect()
    }
}

impl Node for Composite {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn enclosed(&self) -> Vec<Enclosed> {
        vec![Enclosed::Seq(self.args.clone())]
    }

    fn with_args(&self, args: Vec<Arg>) -> Option<Arc<dyn Node>> {
        Some(Arc::new(Composite::new(self.kind, args)))
    }

    fn start(&self) -> Box<dyn Step> {
        let children = self.children();
        match self.kind {
            CompositeKind::Sequence => Box::new(OrderedStep::new(children, Signal::Failure)),
            CompositeKind::Selector => Box::new(OrderedStep::new(children, Signal::Success)),
            CompositeKind::Parallel => Box::new(ParallelStep::new(children)),
            CompositeKind::RepeatAlways => Box::new(RepeatStep::new(children, None)),
            CompositeKind::RepeatUntilFail => {
                Box::new(RepeatStep::new(children, Some(Signal::Failure)))
            }
            CompositeKind::RepeatUntilSucceed => {
                Box::new(RepeatStep::new(children, Some(Signal::Success)))
            }
        }
    }
}

/// Sequence/selector state machine: runs children in order until one
/// reports `stop_on`.
struct OrderedStep {
    children: Vec<NodeRef>,
    next: usize,
    stop_on: Signal,
    done: bool,
}

impl OrderedStep {
    fn new(children: Vec<NodeRef>, stop_on: Signal) -> Self {
        Self {
            children,
            next: 0,
            stop_on,
            done: false,
        }
    }

    fn finish(&mut self, signal: Signal) -> Option<Yield> {
        self.done = true;
        Some(Yield::Signal(signal))
    }
}

#[async_trait]
impl Step for OrderedStep {
    async fn resume(&mut self, input: Option<Signal>) -> Option<Yield> {
        if self.done {
            return None;
        }
        if self.next > 0 && input.as_ref() == Some(&self.stop_on) {
            return self.finish(self.stop_on.clone());
        }
        if let Some(child) = self.children.get(self.next) {
            self.next += 1;
            return Some(Yield::Call(child.start()));
        }
        let exhausted = match self.stop_on {
            Signal::Failure => Signal::Success,
            _ => Signal::Failure,
        };
        self.finish(exhausted)
    }
}

/// Ticks every child once, in order, whatever the siblings reported.
struct ParallelStep {
    children: Vec<NodeRef>,
    next: usize,
    failed: bool,
    done: bool,
}

impl ParallelStep {
    fn new(children: Vec<NodeRef>) -> Self {
        Self {
            children,
            next: 0,
            failed: false,
            done: false,
        }
    }
}

#[async_trait]
impl Step for ParallelStep {
    async fn resume(&mut self, input: Option<Signal>) -> Option<Yield> {
        if self.done {
            return None;
        }
        if self.next > 0 && input != Some(Signal::Success) {
            self.failed = true;
        }
        if let Some(child) = self.children.get(self.next) {
            self.next += 1;
            return Some(Yield::Call(child.start()));
        }
        self.done = true;
        let result = if self.failed {
            Signal::Failure
        } else {
            Signal::Success
        };
        Some(Yield::Signal(result))
    }
}

/// Repeater state machine: reruns the child until it reports `until`.
///
/// With `until = None` the child is rerun forever.
struct RepeatStep {
    child: Option<NodeRef>,
    until: Option<Signal>,
    started: bool,
    done: bool,
}

impl RepeatStep {
    fn new(children: Vec<NodeRef>, until: Option<Signal>) -> Self {
        Self {
            child: children.into_iter().next(),
            until,
            started: false,
            done: false,
        }
    }
}

#[async_trait]
impl Step for RepeatStep {
    async fn resume(&mut self, input: Option<Signal>) -> Option<Yield> {
        if self.done {
            return None;
        }
        if self.started && self.until.is_some() && input == self.until {
            self.done = true;
            return Some(Yield::Signal(Signal::Success));
        }
        let Some(child) = &self.child else {
            self.done = true;
            return Some(Yield::Signal(Signal::Failure));
        };
        self.started = true;
        Some(Yield::Call(child.start()))
    }
}

/// Runs `children` in order until one fails.
pub fn sequence(children: impl IntoIterator<Item = NodeRef>) -> NodeRef {
    composite(CompositeKind::Sequence, children)
}

/// Runs `children` in order until one succeeds.
pub fn selector(children: impl IntoIterator<Item = NodeRef>) -> NodeRef {
    composite(CompositeKind::Selector, children)
}

/// Runs every child in `children`; fails if any of them failed.
pub fn parallel(children: impl IntoIterator<Item = NodeRef>) -> NodeRef {
    composite(CompositeKind::Parallel, children)
}

/// Reruns `child` forever; the step sequence never ends on its own.
pub fn repeat_always(child: NodeRef) -> NodeRef {
    composite(CompositeKind::RepeatAlways, [child])
}

/// Reruns `child` until it fails, then succeeds.
pub fn repeat_until_fail(child: NodeRef) -> NodeRef {
    composite(CompositeKind::RepeatUntilFail, [child])
}

/// Reruns `child` until it succeeds, then succeeds.
pub fn repeat_until_succeed(child: NodeRef) -> NodeRef {
    composite(CompositeKind::RepeatUntilSucceed, [child])
}

fn composite(kind: CompositeKind, children: impl IntoIterator<Item = NodeRef>) -> NodeRef {
    let args = children.into_iter().map(Arg::Node).collect();
    NodeRef::new(Composite::new(kind, args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviors::{fail, fail_after, succeed};
    use crate::nodes::{Scalar, Visit, visit_all};
    use tokio_util::sync::CancellationToken;

    async fn run(tree: &NodeRef) -> Vec<Signal> {
        visit_all(tree, &CancellationToken::new()).await
    }

    #[tokio::test]
    async fn test_sequence_all_succeed() {
        let out = run(&sequence([succeed(), succeed()])).await;
        assert_eq!(out.last(), Some(&Signal::Success));
        assert_eq!(out.len(), 3);
    }

    #[tokio::test]
    async fn test_sequence_stops_on_failure() {
        let out = run(&sequence([fail(), succeed()])).await;
        assert_eq!(out, vec![Signal::Failure, Signal::Failure]);
    }

    #[tokio::test]
    async fn test_selector_all_fail() {
        let out = run(&selector([fail(), fail()])).await;
        assert_eq!(out, vec![Signal::Failure, Signal::Failure, Signal::Failure]);
    }

    #[tokio::test]
    async fn test_running_does_not_break_sequence() {
        let out = run(&sequence([fail_after(1), succeed()])).await;
        assert_eq!(out, vec![Signal::Running, Signal::Failure, Signal::Failure]);
    }

    #[tokio::test]
    async fn test_repeat_until_succeed() {
        let out = run(&repeat_until_succeed(succeed())).await;
        assert_eq!(out, vec![Signal::Success, Signal::Success]);
    }

    #[tokio::test]
    async fn test_parallel_runs_every_child() {
        let out = run(&parallel([fail(), succeed()])).await;
        assert_eq!(out, vec![Signal::Failure, Signal::Success, Signal::Failure]);

        let out = run(&parallel([succeed(), succeed()])).await;
        assert_eq!(out.last(), Some(&Signal::Success));
    }

    #[tokio::test]
    async fn test_repeat_always_keeps_going() {
        let tree = repeat_always(fail());
        let mut visit = Visit::new(&tree);
        for _ in 0..5 {
            assert_eq!(visit.next().await, Some(Signal::Failure));
        }
    }

    #[tokio::test]
    async fn test_empty_sequence_succeeds() {
        let out = run(&sequence([])).await;
        assert_eq!(out, vec![Signal::Success]);
    }

    #[test]
    fn test_with_args_keeps_kind() {
        let node = sequence([succeed()]);
        let rebuilt = node
            .node()
            .with_args(vec![Arg::Scalar(Scalar::Int(1)), Arg::Node(fail())])
            .unwrap();
        assert_eq!(rebuilt.name(), "sequence");
        match &rebuilt.enclosed()[0] {
            Enclosed::Seq(args) => assert_eq!(args.len(), 2),
            other => panic!("unexpected enclosed value: {other:?}"),
        }
    }
}
