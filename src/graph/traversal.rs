use std::collections::{HashSet, VecDeque};

use super::builder::join_key;
use super::{Graph, NodeId, ResolvedValue};

/// A directed reference from one node's payload to another node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    /// Field path of the reference inside the source payload, e.g.
    /// `clusters[0].cluster`.
    pub path: String,
}

impl Graph<'_> {
    /// Every node reference embedded in the payload of `source`, in
    /// depth-first order.
    ///
    /// The walk is over the payload tree, not the node graph, so it always
    /// terminates. Each occurrence of a target is reported as its own edge.
    pub fn edges_from(&self, source: NodeId) -> Vec<Edge> {
        let mut edges = Vec::new();
        if let Some(node) = self.get(source) {
            collect_edges(source, node.resolved_data(), String::new(), &mut edges);
        }
        edges
    }

    /// All edges in the graph, grouped by source in node order.
    pub fn edges(&self) -> Vec<Edge> {
        self.nodes()
            .iter()
            .flat_map(|n| self.edges_from(n.id()))
            .collect()
    }

    /// Nodes that `start` references, transitively, up to `max_depth` hops.
    ///
    /// Each node appears once, paired with the edge that first reached it.
    pub fn dependencies(&self, start: NodeId, max_depth: usize) -> Vec<(NodeId, Edge)> {
        self.breadth_first(start, max_depth, |id| {
            self.edges_from(id)
                .into_iter()
                .map(|e| (e.target, e))
                .collect()
        })
    }

    /// Nodes that reference `start`, transitively, up to `max_depth` hops.
    pub fn dependents(&self, start: NodeId, max_depth: usize) -> Vec<(NodeId, Edge)> {
        let all = self.edges();
        self.breadth_first(start, max_depth, |id| {
            all.iter()
                .filter(|e| e.target == id)
                .map(|e| (e.source, e.clone()))
                .collect()
        })
    }

    fn breadth_first<F>(&self, start: NodeId, max_depth: usize, neighbors: F) -> Vec<(NodeId, Edge)>
    where
        F: Fn(NodeId) -> Vec<(NodeId, Edge)>,
    {
        let mut results = Vec::new();
        if self.get(start).is_none() {
            return results;
        }

        let mut visited: HashSet<NodeId> = HashSet::new();
        visited.insert(start);
        let mut queue: VecDeque<(NodeId, usize)> = VecDeque::new();
        queue.push_back((start, 0));

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            for (next, edge) in neighbors(current) {
                if !visited.insert(next) {
                    continue;
                }
                queue.push_back((next, depth + 1));
                results.push((next, edge));
            }
        }

        results
    }
}

fn collect_edges(source: NodeId, value: &ResolvedValue, path: String, edges: &mut Vec<Edge>) {
    match value {
        ResolvedValue::Node(target) => edges.push(Edge {
            source,
            target: *target,
            path,
        }),
        ResolvedValue::Mapping(map) => {
            for (key, child) in map {
                collect_edges(source, child, join_key(&path, key), edges);
            }
        }
        ResolvedValue::List(items) => {
            for (i, item) in items.iter().enumerate() {
                collect_edges(source, item, format!("{}[{}]", path, i), edges);
            }
        }
        _ => {}
    }
}
