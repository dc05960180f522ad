//! # Step sequences: the resumable execution of a node.
//!
//! A [`Step`] is a suspendable sequence of `(value-in, value-out)` exchanges with
//! its driver. Each [`Step::resume`] call receives the value sent in by the
//! caller and hands back one [`Yield`]:
//!
//! - [`Yield::Signal`] a value for the caller ([`Signal::Success`], [`Signal::Failure`],
//!   [`Signal::Running`] or an arbitrary [`Signal::Custom`] payload);
//! - [`Yield::Call`] a child step sequence the driver must run first; its last signal
//!   is then sent back in as the next input.
//!
//! `None` means the sequence is exhausted.

use async_trait::async_trait;
use serde::{Serialize, Serializer};

/// Recognized terminal/continuation result of a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    Failure,
    /// Not finished yet; resume again.
    Running,
}

impl Status {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Failure => "failure",
            Status::Running => "running",
        }
    }
}

/// Collector wire form: `true` / `false` / `null`.
impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Status::Success => serializer.serialize_bool(true),
            Status::Failure => serializer.serialize_bool(false),
            Status::Running => serializer.serialize_none(),
        }
    }
}

/// Value exchanged across a step boundary.
#[derive(Clone, Debug, PartialEq)]
pub enum Signal {
    Success,
    Failure,
    Running,
    /// Caller-defined result, forwarded opaquely.
    Custom(serde_json::Value),
}

impl Signal {
    /// Recognized status of this signal, `None` for [`Signal::Custom`].
    #[inline]
    pub fn status(&self) -> Option<Status> {
        match self {
            Signal::Success => Some(Status::Success),
            Signal::Failure => Some(Status::Failure),
            Signal::Running => Some(Status::Running),
            Signal::Custom(_) => None,
        }
    }
}

impl From<Status> for Signal {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => Signal::Success,
            Status::Failure => Signal::Failure,
            Status::Running => Signal::Running,
        }
    }
}

/// Output of one [`Step::resume`] call.
pub enum Yield {
    Signal(Signal),
    /// Child step sequence to run before resuming this one.
    Call(Box<dyn Step>),
}

impl Yield {
    #[inline]
    pub fn signal(&self) -> Option<&Signal> {
        match self {
            Yield::Signal(s) => Some(s),
            Yield::Call(_) => None,
        }
    }
}

impl std::fmt::Debug for Yield {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Yield::Signal(s) => f.debug_tuple("Signal").field(s).finish(),
            Yield::Call(_) => f.write_str("Call(..)"),
        }
    }
}

/// Resumable step sequence of a node.
///
/// Driven externally, one resume in flight at a time.
#[async_trait]
pub trait Step: Send {
    /// Advances the sequence with the value sent in by the caller.
    ///
    /// Returns `None` once the sequence is exhausted.
    async fn resume(&mut self, input: Option<Signal>) -> Option<Yield>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_form() {
        assert_eq!(serde_json::to_value(Status::Success).unwrap(), serde_json::json!(true));
        assert_eq!(serde_json::to_value(Status::Failure).unwrap(), serde_json::json!(false));
        assert_eq!(serde_json::to_value(Status::Running).unwrap(), serde_json::Value::Null);
    }

    #[test]
    fn test_custom_signal_has_no_status() {
        assert_eq!(Signal::Custom(serde_json::json!({"k": 1})).status(), None);
        assert_eq!(Signal::Running.status(), Some(Status::Running));
        assert_eq!(Signal::from(Status::Failure), Signal::Failure);
    }
}
