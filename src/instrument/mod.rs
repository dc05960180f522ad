//! Instrumentation: hooked, behaviorally equivalent copies of a tree.
//!
//! ## Contents
//! - [`Instrumenter`] structural, recursive wrapping driven by the identity map
//! - [`EventShape`] entry+result or result-only notifications
//! - [`Hooks`], [`HookFn`] receivers of `entered` / `produced`

mod hooks;
mod instrumenter;

pub use hooks::{HookFn, Hooks};
pub use instrumenter::{EventShape, Instrumenter};
