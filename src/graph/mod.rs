/// Two-pass construction of a graph from an inventory.
pub mod builder;

/// Edge enumeration and dependency traversal.
pub mod traversal;

use std::collections::BTreeMap;
use std::fmt;

use crate::resource::Resource;

pub use builder::{build_graph, GraphBuilder};
pub use traversal::Edge;

/// Handle to a node in a [`Graph`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A resource payload after reference resolution.
///
/// Structurally identical to the source [`crate::resource::Value`], except
/// that every reference is replaced by the handle of the node it names.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue {
    Null,
    Bool(bool),
    Integer(i64),
    UInt(u64),
    Float(f64),
    String(String),
    List(Vec<ResolvedValue>),
    Mapping(BTreeMap<String, ResolvedValue>),
    Node(NodeId),
}

impl ResolvedValue {
    /// Looks up `key` when this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&ResolvedValue> {
        match self {
            ResolvedValue::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    /// Returns element `i` when this value is a list.
    pub fn at(&self, i: usize) -> Option<&ResolvedValue> {
        match self {
            ResolvedValue::List(items) => items.get(i),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            ResolvedValue::Node(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ResolvedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ResolvedValue]> {
        match self {
            ResolvedValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// The graph-time representation of one resource.
#[derive(Debug, Clone)]
pub struct Node<'a> {
    id: NodeId,
    resource: &'a Resource,
    resolved: ResolvedValue,
}

impl<'a> Node<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &'a str {
        self.resource.kind()
    }

    pub fn name(&self) -> &'a str {
        self.resource.name()
    }

    /// The inventory resource this node was built from.
    pub fn resource(&self) -> &'a Resource {
        self.resource
    }

    /// `kind/name`, used as a unique label by renderers.
    pub fn qualified_name(&self) -> String {
        self.resource.qualified_name()
    }

    /// The payload with every reference replaced by a node handle.
    pub fn resolved_data(&self) -> &ResolvedValue {
        &self.resolved
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind(), self.name())
    }
}

pub(crate) type Index<'a> = BTreeMap<&'a str, BTreeMap<&'a str, NodeId>>;

/// Every resource of an inventory as a node, with references resolved.
///
/// Nodes live in an arena and refer to each other by [`NodeId`], so reference
/// cycles between resources need no shared ownership. The graph borrows the
/// inventory it was built from and is immutable once built.
#[derive(Debug, Clone)]
pub struct Graph<'a> {
    nodes: Vec<Node<'a>>,
    index: Index<'a>,
}

impl<'a> Graph<'a> {
    /// All kinds present, in sorted order.
    pub fn kinds(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.index.keys().copied()
    }

    /// All `(name, node)` pairs of one kind, sorted by name.
    pub fn nodes_of_kind<'g>(&'g self, kind: &str) -> impl Iterator<Item = (&'a str, &'g Node<'a>)> + 'g {
        self.index
            .get(kind)
            .into_iter()
            .flat_map(move |by_name| by_name.iter().map(move |(name, id)| (*name, &self.nodes[id.0])))
    }

    /// All nodes ordered by kind then name.
    pub fn nodes(&self) -> &[Node<'a>] {
        &self.nodes
    }

    /// Looks up a node by kind and name.
    pub fn node(&self, kind: &str, name: &str) -> Option<&Node<'a>> {
        self.index
            .get(kind)
            .and_then(|by_name| by_name.get(name))
            .map(|id| &self.nodes[id.0])
    }

    /// Looks up a node by its `kind/name` label.
    pub fn find(&self, qualified: &str) -> Option<&Node<'a>> {
        let (kind, name) = qualified.split_once('/')?;
        self.node(kind, name)
    }

    /// Resolves a handle. `None` for handles from another graph.
    pub fn get(&self, id: NodeId) -> Option<&Node<'a>> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
