use serde_json::{json, Map, Value as JsonValue};

use crate::errors::{Result, TpologyError};
use crate::graph::{Graph, Node, ResolvedValue};
use crate::resource::Resource;

/// Pretty-printed JSON array of resources in their wire shape.
pub fn to_json(resources: &[&Resource]) -> Result<String> {
    Ok(serde_json::to_string_pretty(resources)?)
}

/// YAML sequence of resources in their wire shape.
pub fn to_yaml(resources: &[&Resource]) -> Result<String> {
    yaml_string(&resources)
}

/// Any serializable value as YAML.
pub fn yaml_string<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| TpologyError::Render {
        message: format!("failed to encode yaml: {}", e),
    })
}

/// Converts a resolved payload to JSON; node handles become
/// `{"$ref": "kind/name"}`.
pub fn resolved_to_json(graph: &Graph<'_>, value: &ResolvedValue) -> JsonValue {
    match value {
        ResolvedValue::Null => JsonValue::Null,
        ResolvedValue::Bool(b) => JsonValue::Bool(*b),
        ResolvedValue::Integer(i) => json!(i),
        ResolvedValue::UInt(u) => json!(u),
        ResolvedValue::Float(f) => json!(f),
        ResolvedValue::String(s) => JsonValue::String(s.clone()),
        ResolvedValue::List(items) => {
            JsonValue::Array(items.iter().map(|v| resolved_to_json(graph, v)).collect())
        }
        ResolvedValue::Mapping(map) => JsonValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), resolved_to_json(graph, v)))
                .collect::<Map<_, _>>(),
        ),
        ResolvedValue::Node(id) => match graph.get(*id) {
            Some(node) => json!({ "$ref": node.qualified_name() }),
            None => JsonValue::Null,
        },
    }
}

/// One node with its metadata and resolved payload.
pub fn node_json(graph: &Graph<'_>, node: &Node<'_>) -> JsonValue {
    json!({
        "id": node.qualified_name(),
        "kind": node.kind(),
        "name": node.name(),
        "description": node.resource().description(),
        "owner": node.resource().owner(),
        "data": resolved_to_json(graph, node.resolved_data()),
    })
}

/// The whole graph as `{"nodes": [...], "edges": [...]}`.
pub fn graph_json(graph: &Graph<'_>) -> JsonValue {
    let nodes: Vec<JsonValue> = graph.nodes().iter().map(|n| node_json(graph, n)).collect();

    let edges: Vec<JsonValue> = graph
        .edges()
        .iter()
        .filter_map(|e| {
            let source = graph.get(e.source)?;
            let target = graph.get(e.target)?;
            Some(json!({
                "source": source.qualified_name(),
                "target": target.qualified_name(),
                "path": e.path,
            }))
        })
        .collect();

    json!({ "nodes": nodes, "edges": edges })
}
