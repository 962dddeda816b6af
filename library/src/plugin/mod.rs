//! Node-type registry and the built-in node definitions.

pub mod node_definitions;
pub mod node_types;
pub mod registry;

pub use node_definitions::register_builtin_nodes;
pub use node_types::{NodeCategory, NodeEvaluator, NodeTypeDefinition, PortDefinition, PortDirection};
pub use registry::NodeRegistry;
