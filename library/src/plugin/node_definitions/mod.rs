//! Built-in node type definitions, one module per category.

mod color;
mod compositing;
mod data;
mod generators;
mod logic;
mod math;
mod output;

use crate::model::value::{OutputMap, Value, ValueKind};
use crate::plugin::node_types::{NodeCategory, NodeEvaluator, NodeTypeDefinition, PortDefinition};
use crate::plugin::registry::NodeRegistry;

/// Register all built-in node type definitions.
pub fn register_builtin_nodes(registry: &mut NodeRegistry) {
    for def in all_node_definitions() {
        registry.register(def);
    }
}

// ---------------------------------------------------------------------------
// Port helpers
// ---------------------------------------------------------------------------

fn inp(id: &str, display: &str, kind: ValueKind) -> PortDefinition {
    PortDefinition::input(id, display, kind)
}

fn out(id: &str, display: &str, kind: ValueKind) -> PortDefinition {
    PortDefinition::output(id, display, kind)
}

fn node(
    type_name: &str,
    name: &str,
    cat: NodeCategory,
    evaluator: impl NodeEvaluator + 'static,
) -> NodeTypeDefinition {
    NodeTypeDefinition::new(type_name, name, cat, evaluator)
}

/// Outputs of a node with a single output port.
fn single(port: &str, value: impl Into<Value>) -> OutputMap {
    OutputMap::from([(port.to_string(), value.into())])
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

fn all_node_definitions() -> Vec<NodeTypeDefinition> {
    [
        data::data_nodes(),
        generators::generator_nodes(),
        color::color_nodes(),
        math::math_nodes(),
        compositing::compositing_nodes(),
        logic::logic_nodes(),
        output::output_nodes(),
    ]
    .concat()
}
