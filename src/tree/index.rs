//! # Tree indexing: parse, identify, describe.
//!
//! [`TreeIndexer::index`] walks the root depth-first with [`classify`], producing:
//! - a [`ParsedTree`] (`node → children`, original child order at every level);
//! - an [`IdentityMap`] (node identity → [`NodeId`](super::NodeId)).
//!
//! [`TreeIndexer::structure`] projects both into a [`StructureDescriptor`].
//!
//! ## Rules
//! - Each node appears at exactly the position the original topology gives it.
//! - The walk assumes no cycles.
//! - Ids derive from node identity, never from content.

use crate::config::AbsentParams;
use crate::nodes::NodeRef;

use super::ident::IdentityMap;
use super::introspect::{Shape, classify};
use super::structure::StructureDescriptor;

/// Recursive `node → children` view of a tree.
#[derive(Clone, Debug)]
pub struct ParsedTree {
    pub node: NodeRef,
    pub shape: Shape,
    pub children: Vec<ParsedTree>,
}

impl ParsedTree {
    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(ParsedTree::len).sum::<usize>()
    }

    /// Always false: a parsed tree holds at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Walks a tree and builds its parsed form and identity map.
#[derive(Clone, Debug, Default)]
pub struct TreeIndexer {
    absent: AbsentParams,
}

impl TreeIndexer {
    pub fn new(absent: AbsentParams) -> Self {
        Self { absent }
    }

    /// Parses `root` and assigns an id to every node.
    pub fn index(&self, root: &NodeRef) -> (ParsedTree, IdentityMap) {
        let mut ids = IdentityMap::default();
        let parsed = Self::parse(root, &mut ids);
        (parsed, ids)
    }

    fn parse(node: &NodeRef, ids: &mut IdentityMap) -> ParsedTree {
        ids.assign(node);
        let shape = classify(node);
        let children = shape
            .children()
            .iter()
            .map(|child| Self::parse(child, ids))
            .collect();
        ParsedTree {
            node: node.clone(),
            shape,
            children,
        }
    }

    /// Description of a single node: positional then name-sorted named params.
    pub fn describe(&self, node: &NodeRef) -> String {
        classify(node).params().describe(&self.absent)
    }

    /// Projects a parsed tree into its display form.
    pub fn structure(&self, parsed: &ParsedTree, ids: &IdentityMap) -> StructureDescriptor {
        StructureDescriptor {
            name: parsed.node.name().to_string(),
            id: ids.id_of(&parsed.node),
            desc: parsed.shape.params().describe(&self.absent),
            children: parsed
                .children
                .iter()
                .map(|child| self.structure(child, ids))
                .collect(),
        }
    }

    /// Convenience: index and project in one go.
    pub fn descriptor(&self, root: &NodeRef) -> (StructureDescriptor, IdentityMap) {
        let (parsed, ids) = self.index(root);
        (self.structure(&parsed, &ids), ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviors::{
        Blackboard, check_bb, fail, fail_after, log, parallel, repeat_always, repeat_until_fail,
        repeat_until_succeed, selector, sequence, set_bb, succeed,
    };
    use crate::tree::Detail;
    use serde_json::json;

    fn names(root: &NodeRef) -> serde_json::Value {
        let (s, _) = TreeIndexer::default().descriptor(root);
        s.to_json(Detail::NamesOnly)
    }

    #[test]
    fn test_structure_small() {
        let tree = sequence([succeed(), fail()]);
        assert_eq!(
            names(&tree),
            json!({"name": "sequence", "children": [
                {"name": "succeed", "children": []},
                {"name": "fail", "children": []}
            ]})
        );
    }

    #[test]
    fn test_structure_big_keeps_order() {
        let board = Blackboard::new();
        let tree = parallel([
            sequence([repeat_always(set_bb(&board, "k", 1)), log("m")]),
            selector([repeat_until_succeed(check_bb(&board, "k", |_| true))]),
            repeat_until_fail(fail()),
        ]);
        assert_eq!(
            names(&tree),
            json!({"name": "parallel", "children": [
                {"name": "sequence", "children": [
                    {"name": "repeat_always", "children": [{"name": "set_bb", "children": []}]},
                    {"name": "log", "children": []}
                ]},
                {"name": "selector", "children": [
                    {"name": "repeat_until_succeed", "children": [{"name": "check_bb", "children": []}]}
                ]},
                {"name": "repeat_until_fail", "children": [{"name": "fail", "children": []}]}
            ]})
        );
    }

    #[test]
    fn test_descriptions() {
        let board = Blackboard::new();
        let indexer = TreeIndexer::default();
        assert_eq!(indexer.describe(&fail_after(10)), "10");
        assert_eq!(indexer.describe(&set_bb(&board, "somekey", 3)), "somekey 3");
        assert_eq!(indexer.describe(&check_bb(&board, "somekey", |_| true)), "somekey");
        assert_eq!(indexer.describe(&log("some message")), "some message");
        assert_eq!(indexer.describe(&succeed()), "");
        assert_eq!(indexer.describe(&set_bb(&board, "armed", true)), "armed True");
    }

    #[test]
    fn test_small_tree_descriptions() {
        let tree = sequence([fail_after(10), log("How did you execute me?")]);
        let (s, _) = TreeIndexer::default().descriptor(&tree);
        let v = s.to_json(Detail::WithoutIds);
        assert_eq!(
            v,
            json!({"name": "sequence", "desc": "", "children": [
                {"name": "fail_after", "desc": "10", "children": []},
                {"name": "log", "desc": "How did you execute me?", "children": []}
            ]})
        );
    }

    #[test]
    fn test_ids_stable_across_indexing() {
        let tree = sequence([succeed(), succeed()]);
        let indexer = TreeIndexer::default();
        let (first, _) = indexer.descriptor(&tree);
        let (second, _) = indexer.descriptor(&tree);
        assert_eq!(first.ids(), second.ids());
    }

    #[test]
    fn test_identical_nodes_get_distinct_ids() {
        let tree = sequence([succeed(), succeed()]);
        let (s, ids) = TreeIndexer::default().descriptor(&tree);
        assert_ne!(s.children[0].id, s.children[1].id);
        assert_eq!(ids.len(), 3);
        assert_eq!(ids.id_of(&tree), s.id);
    }

    #[test]
    fn test_parsed_tree_len() {
        let tree = sequence([succeed(), sequence([fail()])]);
        let (parsed, _) = TreeIndexer::default().index(&tree);
        assert_eq!(parsed.len(), 4);
        assert_eq!(parsed.children[1].children[0].node.name(), "fail");
    }
}
