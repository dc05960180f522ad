//! # Shape detection for opaque nodes.
//!
//! [`classify`] decides whether a node is composite by looking only at what it
//! encloses:
//!
//! ```text
//! enclosed():  [ Seq(args) ]               → Composite (children = Node args, in order)
//!              [ Seq(a), Seq(b) ]          → Leaf      (ambiguous: more than one sequence)
//!              [ Map(..), Value(..) ]      → Leaf      (no sequence)
//! ```
//!
//! This is a structural heuristic and **not** a contract the node library
//! declares: a node that does not have exactly one sequence collection is
//! treated as a leaf rather than rejected. Named parameters are read from every
//! mapping collection regardless of the outcome.
//!
//! Only [`Arg::Scalar`] values are descriptive; child nodes and
//! [`Arg::Opaque`] values never show up in [`Params`].

use crate::config::AbsentParams;
use crate::nodes::{Arg, Enclosed, NodeRef, Scalar};

/// Scalar parameters of a node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params {
    /// Scalars from sequence collections, in original order.
    pub positional: Vec<Scalar>,
    /// Scalars from mapping collections, sorted by name.
    pub named: Vec<(String, Scalar)>,
}

impl Params {
    /// Space-joined rendering: positional first, then named (name-sorted).
    ///
    /// Absent values are rendered according to `absent`.
    pub fn describe(&self, absent: &AbsentParams) -> String {
        self.positional
            .iter()
            .chain(self.named.iter().map(|(_, v)| v))
            .filter_map(|v| match v.render() {
                Some(s) => Some(s),
                None => absent.literal().map(str::to_string),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

/// Result of [`classify`].
#[derive(Clone, Debug)]
pub enum Shape {
    /// Node with exactly one sequence collection.
    Composite {
        /// The full sequence collection, children and scalars in original order.
        args: Vec<Arg>,
        params: Params,
    },
    Leaf {
        params: Params,
    },
}

impl Shape {
    /// Child nodes in original order; empty for leaves.
    pub fn children(&self) -> Vec<NodeRef> {
        match self {
            Shape::Composite { args, .. } => args.iter().filter_map(Arg::as_node).cloned().collect(),
            Shape::Leaf { .. } => Vec::new(),
        }
    }

    pub fn params(&self) -> &Params {
        match self {
            Shape::Composite { params, .. } | Shape::Leaf { params } => params,
        }
    }

    #[inline]
    pub fn is_composite(&self) -> bool {
        matches!(self, Shape::Composite { .. })
    }
}

/// Classifies `node` as composite or leaf and collects its scalar parameters.
pub fn classify(node: &NodeRef) -> Shape {
    let enclosed = node.enclosed();

    let mut params = Params::default();
    let mut sequences = Vec::new();
    for value in enclosed {
        match value {
            Enclosed::Seq(args) => {
                params
                    .positional
                    .extend(args.iter().filter_map(Arg::as_scalar).cloned());
                sequences.push(args);
            }
            Enclosed::Map(named) => {
                params.named.extend(
                    named
                        .into_iter()
                        .filter_map(|(k, v)| v.as_scalar().cloned().map(|s| (k, s))),
                );
            }
            Enclosed::Value(_) => {}
        }
    }
    params.named.sort_by(|a, b| a.0.cmp(&b.0));

    if sequences.len() == 1 {
        let args = sequences.pop().unwrap_or_default();
        Shape::Composite { args, params }
    } else {
        Shape::Leaf { params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviors::{Blackboard, check_bb, fail, fail_after, log, sequence, set_bb, succeed};
    use crate::nodes::{Node, Step};
    use std::collections::BTreeMap;

    struct TwoLists;

    impl Node for TwoLists {
        fn name(&self) -> &str {
            "two_lists"
        }

        fn enclosed(&self) -> Vec<Enclosed> {
            vec![
                Enclosed::Seq(vec![Arg::Node(succeed()), Arg::Scalar(Scalar::Int(1))]),
                Enclosed::Seq(vec![Arg::Scalar(Scalar::Str("x".into()))]),
            ]
        }

        fn start(&self) -> Box<dyn Step> {
            succeed().start()
        }
    }

    #[test]
    fn test_single_sequence_is_composite() {
        let a = succeed();
        let b = fail();
        let shape = classify(&sequence([a.clone(), b.clone()]));
        assert!(shape.is_composite());
        let keys: Vec<_> = shape.children().iter().map(NodeRef::key).collect();
        assert_eq!(keys, vec![a.key(), b.key()]);
    }

    #[test]
    fn test_more_than_one_sequence_is_leaf() {
        let shape = classify(&NodeRef::new(TwoLists));
        assert!(!shape.is_composite());
        assert!(shape.children().is_empty());
        assert_eq!(
            shape.params().positional,
            vec![Scalar::Int(1), Scalar::Str("x".into())]
        );
    }

    #[test]
    fn test_no_sequence_is_leaf() {
        let shape = classify(&fail_after(10));
        assert!(!shape.is_composite());
        assert_eq!(shape.params().named, vec![("after".to_string(), Scalar::Int(10))]);
    }

    #[test]
    fn test_sequence_of_scalars_is_childless_composite() {
        let shape = classify(&log("hi"));
        assert!(shape.is_composite());
        assert!(shape.children().is_empty());
    }

    #[test]
    fn test_opaque_values_are_ignored() {
        let board = Blackboard::new();
        let shape = classify(&check_bb(&board, "somekey", |_| true));
        assert_eq!(
            shape.params().named,
            vec![("key".to_string(), Scalar::Str("somekey".into()))]
        );
    }

    #[test]
    fn test_describe_orders_named_by_name() {
        let board = Blackboard::new();
        let shape = classify(&set_bb(&board, "somekey", 3));
        assert_eq!(shape.params().describe(&AbsentParams::default()), "somekey 3");
    }

    #[test]
    fn test_describe_absent_values() {
        let mut named = BTreeMap::new();
        named.insert("b".to_string(), Scalar::Absent);
        let params = Params {
            positional: vec![Scalar::Int(1)],
            named: named.into_iter().collect(),
        };
        assert_eq!(params.describe(&AbsentParams::default()), "1 None");
        assert_eq!(params.describe(&AbsentParams::Omit), "1");
        assert_eq!(params.describe(&AbsentParams::Literal("null".into())), "1 null");
    }
}
