use std::collections::BTreeMap;

use tracing::{debug, info};

use super::{Graph, Index, Node, NodeId, ResolvedValue};
use crate::errors::{Result, TpologyError};
use crate::inventory::Inventory;
use crate::resource::{Resource, Value};

/// Builds the reference graph of `inventory`.
///
/// Fails on the first dangling reference; no partial graph is returned.
pub fn build_graph(inventory: &Inventory) -> Result<Graph<'_>> {
    GraphBuilder::new(inventory).build()
}

/// Turns an inventory snapshot into a [`Graph`].
///
/// Pass 1 materializes one node per resource. Pass 2 rewrites each payload:
/// a mapping entry whose key names a kind present in the inventory and whose
/// value is a string becomes a handle to the node of that kind and name.
/// Everything else is copied, recursing through lists and mappings.
pub struct GraphBuilder<'a> {
    inventory: &'a Inventory,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(inventory: &'a Inventory) -> Self {
        Self { inventory }
    }

    pub fn build(self) -> Result<Graph<'a>> {
        // Pass 1: assign every resource a node id, ordered by kind then name.
        let mut index: Index<'a> = BTreeMap::new();
        let mut resources: Vec<&'a Resource> = Vec::with_capacity(self.inventory.len());
        for kind in self.inventory.kinds() {
            let Some(by_name) = self.inventory.resources_of_kind(kind) else {
                continue;
            };
            let ids = index.entry(kind).or_default();
            for (name, resource) in by_name {
                ids.insert(name.as_str(), NodeId(resources.len()));
                resources.push(resource);
            }
        }
        debug!(
            nodes = resources.len(),
            kinds = index.len(),
            "materialized graph nodes"
        );

        // Pass 2: resolve references.
        let resolver = Resolver { index: &index };
        let mut nodes = Vec::with_capacity(resources.len());
        for (i, resource) in resources.into_iter().enumerate() {
            let resolved = resolver.resolve(resource, &resource.data, "")?;
            nodes.push(Node {
                id: NodeId(i),
                resource,
                resolved,
            });
        }

        info!(nodes = nodes.len(), "built resource graph");
        Ok(Graph { nodes, index })
    }
}

struct Resolver<'g, 'a> {
    index: &'g Index<'a>,
}

impl Resolver<'_, '_> {
    /// Whether a mapping key denotes a reference to a resource of that kind.
    fn is_reference_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    fn resolve(&self, source: &Resource, value: &Value, path: &str) -> Result<ResolvedValue> {
        Ok(match value {
            Value::Mapping(map) => {
                let mut out = BTreeMap::new();
                for (key, child) in map {
                    let child_path = join_key(path, key);
                    let resolved = match child {
                        Value::String(target) if self.is_reference_key(key) => {
                            ResolvedValue::Node(self.lookup(source, key, target, child_path)?)
                        }
                        other => self.resolve(source, other, &child_path)?,
                    };
                    out.insert(key.clone(), resolved);
                }
                ResolvedValue::Mapping(out)
            }
            Value::List(items) => ResolvedValue::List(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.resolve(source, item, &format!("{}[{}]", path, i)))
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::String(s) => ResolvedValue::String(s.clone()),
            Value::Integer(i) => ResolvedValue::Integer(*i),
            Value::UInt(u) => ResolvedValue::UInt(*u),
            Value::Float(f) => ResolvedValue::Float(*f),
            Value::Bool(b) => ResolvedValue::Bool(*b),
            Value::Null => ResolvedValue::Null,
        })
    }

    fn lookup(&self, source: &Resource, kind: &str, target: &str, path: String) -> Result<NodeId> {
        self.index
            .get(kind)
            .and_then(|by_name| by_name.get(target))
            .copied()
            .ok_or_else(|| TpologyError::DanglingReference {
                kind: source.kind().to_string(),
                name: source.name().to_string(),
                key: kind.to_string(),
                target: target.to_string(),
                path,
            })
    }
}

pub(crate) fn join_key(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}
