//! # Display-facing projection of a parsed tree.
//!
//! [`StructureDescriptor`] is what the collector receives in `introduce`:
//!
//! ```json
//! { "name": "sequence", "id": "b", "desc": "",
//!   "children": [ { "name": "succeed", "id": "c", "desc": "", "children": [] } ] }
//! ```
//!
//! [`Detail`] drops `id`/`desc` for lower verbosity levels.

use serde::Serialize;
use serde_json::{Map, Value};

use super::ident::NodeId;

/// Verbosity of the structure JSON.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Detail {
    /// `name`, `id`, `desc`, `children`.
    #[default]
    Full,
    /// `name`, `desc`, `children`.
    WithoutIds,
    /// `name`, `children`.
    NamesOnly,
}

/// Serializable node structure, computed once per tree.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StructureDescriptor {
    pub name: String,
    pub id: NodeId,
    pub desc: String,
    pub children: Vec<StructureDescriptor>,
}

impl StructureDescriptor {
    /// JSON form at the given verbosity.
    pub fn to_json(&self, detail: Detail) -> Value {
        let mut obj = Map::new();
        obj.insert("name".into(), Value::String(self.name.clone()));
        if detail == Detail::Full {
            obj.insert("id".into(), Value::String(self.id.to_string()));
        }
        if detail != Detail::NamesOnly {
            obj.insert("desc".into(), Value::String(self.desc.clone()));
        }
        obj.insert(
            "children".into(),
            Value::Array(self.children.iter().map(|c| c.to_json(detail)).collect()),
        );
        Value::Object(obj)
    }

    /// Finds the descriptor with the given id (depth-first).
    pub fn find(&self, id: &NodeId) -> Option<&StructureDescriptor> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// All ids in depth-first pre-order.
    pub fn ids(&self) -> Vec<NodeId> {
        let mut out = vec![self.id.clone()];
        for child in &self.children {
            out.extend(child.ids());
        }
        out
    }
}
