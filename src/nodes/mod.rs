//! # Node contract: the capability set every watched node exposes.
//!
//! This module groups the types a node library implements so that its trees
//! can be indexed and instrumented:
//! - [`Node`], [`NodeRef`], [`NodeKey`] the node itself, its shared handle and identity token
//! - [`Enclosed`], [`Arg`], [`Scalar`] the enclosed values a node exposes for introspection
//! - [`Step`], [`Signal`], [`Yield`], [`Status`] the resumable step protocol
//! - [`Visit`], [`visit_all`] the trampolining driver that runs a tree to completion
//!
//! ## Quick wiring
//! ```text
//! NodeRef ──start()──► Box<dyn Step> ──resume(input)──► Yield::Signal(..)  → reported to the driver's caller
//!                                                    └─► Yield::Call(step) → pushed by Visit, its last
//!                                                                            signal is sent back to the parent
//! ```

mod node;
mod step;
mod visit;

pub use node::{Arg, Enclosed, Node, NodeKey, NodeRef, Scalar};
pub use step::{Signal, Status, Step, Yield};
pub use visit::{Visit, visit_all};
