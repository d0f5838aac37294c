/// Markdown and CSV tables.
mod table;

/// Graphviz output.
mod dot;

/// Structured dumps of resources and graphs.
mod structured;

/// `resource list` output in every supported format.
mod listing;

pub use dot::write_dot;
pub use listing::{list_kinds, list_resources};
pub use structured::{graph_json, node_json, resolved_to_json, to_json, to_yaml, yaml_string};
pub use table::{kind_table, resource_table, Table, TableFormat};
