//! # Watch configuration.
//!
//! Provides [`WatchConfig`] centralized settings for a [`TreeWatch`](crate::TreeWatch):
//!
//! 1. **Indexing**: how absent parameters show up in node descriptions ([`AbsentParams`])
//! 2. **Instrumentation**: which notifications a hooked tree emits ([`EventShape`])
//!
//! Collector settings live in [`ConnectionConfig`](crate::ConnectionConfig).

use crate::instrument::EventShape;

/// Rendering of absent (`None`-like) parameters in descriptions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbsentParams {
    /// Render absent values as the given literal text.
    Literal(String),
    /// Leave absent values out of the description.
    Omit,
}

impl AbsentParams {
    /// Literal text to render, `None` when absent values are omitted.
    #[inline]
    pub fn literal(&self) -> Option<&str> {
        match self {
            AbsentParams::Literal(s) => Some(s),
            AbsentParams::Omit => None,
        }
    }
}

impl Default for AbsentParams {
    /// Returns `Literal("None")`.
    fn default() -> Self {
        AbsentParams::Literal("None".to_string())
    }
}

/// Configuration of a watched tree.
///
/// ## Field semantics
/// - `events`: notification shape of the hooked tree (entry+result or result-only)
/// - `absent`: rendering of absent parameters in descriptions
#[derive(Clone, Debug, Default)]
pub struct WatchConfig {
    /// Which notifications instrumented nodes emit.
    pub events: EventShape,

    /// How absent parameters are rendered in node descriptions.
    pub absent: AbsentParams,
}
