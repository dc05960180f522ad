//! Tree discovery: introspection, indexing and the structure descriptor.
//!
//! ## Contents
//! - [`classify`], [`Shape`], [`Params`] composite/leaf heuristic and scalar parameters
//! - [`TreeIndexer`], [`ParsedTree`] depth-first walk building the parsed tree
//! - [`NodeId`], [`IdentityMap`] stable display ids
//! - [`StructureDescriptor`], [`Detail`] the serializable display projection
//!
//! ## Quick wiring
//! ```text
//! root ──► TreeIndexer::index ──► (ParsedTree, IdentityMap)
//!                                     │             │
//!                                     └──► structure() ──► StructureDescriptor ──► introduce
//!                                                   │
//!                                                   └────► Instrumenter (same ids on hooked nodes)
//! ```

mod ident;
mod index;
mod introspect;
mod structure;

pub use ident::{IdentityMap, NodeId};
pub use index::{ParsedTree, TreeIndexer};
pub use introspect::{Params, Shape, classify};
pub use structure::{Detail, StructureDescriptor};
