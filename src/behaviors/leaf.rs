//! Leaf behaviors: fixed outcomes, delayed failure, logging.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::nodes::{Arg, Enclosed, Node, NodeRef, Scalar, Signal, Status, Step, Yield};

/// Yields one fixed status.
struct Fixed {
    name: &'static str,
    status: Status,
}

struct FixedStep {
    status: Option<Status>,
}

#[async_trait]
impl Step for FixedStep {
    async fn resume(&mut self, _input: Option<Signal>) -> Option<Yield> {
        self.status.take().map(|s| Yield::Signal(s.into()))
    }
}

impl Node for Fixed {
    fn name(&self) -> &str {
        self.name
    }

    fn start(&self) -> Box<dyn Step> {
        Box::new(FixedStep {
            status: Some(self.status),
        })
    }
}

/// Always succeeds.
pub fn succeed() -> NodeRef {
    NodeRef::new(Fixed {
        name: "succeed",
        status: Status::Success,
    })
}

/// Always fails.
pub fn fail() -> NodeRef {
    NodeRef::new(Fixed {
        name: "fail",
        status: Status::Failure,
    })
}

struct FailAfter {
    after: i64,
}

struct FailAfterStep {
    remaining: i64,
    done: bool,
}

#[async_trait]
impl Step for FailAfterStep {
    async fn resume(&mut self, _input: Option<Signal>) -> Option<Yield> {
        if self.done {
            return None;
        }
        if self.remaining > 0 {
            self.remaining -= 1;
            return Some(Yield::Signal(Signal::Running));
        }
        self.done = true;
        Some(Yield::Signal(Signal::Failure))
    }
}

impl Node for FailAfter {
    fn name(&self) -> &str {
        "fail_after"
    }

    fn enclosed(&self) -> Vec<Enclosed> {
        let mut named = BTreeMap::new();
        named.insert("after".to_string(), Arg::Scalar(Scalar::Int(self.after)));
        vec![Enclosed::Map(named)]
    }

    fn start(&self) -> Box<dyn Step> {
        Box::new(FailAfterStep {
            remaining: self.after,
            done: false,
        })
    }
}

/// Reports `Running` `after` times, then fails.
pub fn fail_after(after: i64) -> NodeRef {
    NodeRef::new(FailAfter { after })
}

struct Log {
    args: Vec<Arg>,
}

impl Log {
    fn message(&self) -> String {
        self.args
            .iter()
            .filter_map(Arg::as_scalar)
            .filter_map(Scalar::render)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Node for Log {
    fn name(&self) -> &str {
        "log"
    }

    fn enclosed(&self) -> Vec<Enclosed> {
        vec![Enclosed::Seq(self.args.clone())]
    }

    fn with_args(&self, args: Vec<Arg>) -> Option<Arc<dyn Node>> {
        Some(Arc::new(Log { args }))
    }

    fn start(&self) -> Box<dyn Step> {
        Box::new(LogStep {
            message: Some(self.message()),
        })
    }
}

struct LogStep {
    message: Option<String>,
}

#[async_trait]
impl Step for LogStep {
    async fn resume(&mut self, _input: Option<Signal>) -> Option<Yield> {
        let message = self.message.take()?;
        tracing::info!(target: "treewatch::behaviors", %message, "log node");
        Some(Yield::Signal(Signal::Success))
    }
}

/// Logs `message` and succeeds.
pub fn log(message: impl Into<String>) -> NodeRef {
    NodeRef::new(Log {
        args: vec![Arg::Scalar(Scalar::Str(message.into()))],
    })
}
