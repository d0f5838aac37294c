pub mod config;
pub mod errors;
pub mod git;
pub mod graph;
pub mod inventory;
pub mod render;
pub mod resource;
pub mod tpology;

#[doc(hidden)]
pub mod fixtures;

pub use errors::{Result, TpologyError};
pub use graph::{build_graph, Graph, Node, NodeId, ResolvedValue};
pub use inventory::{Inventory, LoadOptions};
pub use resource::{Resource, Value};
