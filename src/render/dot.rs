use std::io::Write;

use crate::errors::Result;
use crate::graph::Graph;

/// Writes the graph as a Graphviz `digraph`.
///
/// Every node is declared so resources without references still appear.
/// Edges follow node order, then payload order.
pub fn write_dot<W: Write>(w: &mut W, graph: &Graph<'_>) -> Result<()> {
    writeln!(w, "digraph {{")?;
    for node in graph.nodes() {
        writeln!(w, "    {};", quote(&node.qualified_name()))?;
    }
    for edge in graph.edges() {
        if let (Some(source), Some(target)) = (graph.get(edge.source), graph.get(edge.target)) {
            writeln!(
                w,
                "    {} -> {};",
                quote(&source.qualified_name()),
                quote(&target.qualified_name())
            )?;
        }
    }
    writeln!(w, "}}")?;
    Ok(())
}

fn quote(label: &str) -> String {
    format!("\"{}\"", label.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("a/b"), "\"a/b\"");
        assert_eq!(quote("a/\"b\""), "\"a/\\\"b\\\"\"");
    }
}
