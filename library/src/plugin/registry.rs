//! Catalog of node types, keyed by type name.

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};

use super::node_definitions::register_builtin_nodes;
use super::node_types::{NodeCategory, NodeTypeDefinition};
use crate::error::GraphError;
use crate::model::graph::NodeInstance;
use crate::model::value::ParamMap;

/// Registry of every node type known to the process.
///
/// Built once at startup; every node-type module registers into it. The
/// evaluation engine only ever borrows it immutably, so it cannot change
/// during an evaluation pass.
#[derive(Default)]
pub struct NodeRegistry {
    types: HashMap<String, NodeTypeDefinition>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with all built-in node types registered.
    pub fn with_builtin_nodes() -> Self {
        let mut registry = Self::new();
        register_builtin_nodes(&mut registry);
        registry
    }

    /// Add a definition, replacing any existing one with the same type name.
    ///
    /// Replacement usually means two modules claim the same name, so it is
    /// logged; the newer definition wins.
    pub fn register(&mut self, def: NodeTypeDefinition) -> Option<NodeTypeDefinition> {
        debug!("NodeRegistry: registering '{}'", def.type_name);
        let previous = self.types.insert(def.type_name.clone(), def);
        if let Some(prev) = &previous {
            warn!("Node type '{}' registered twice; replacing", prev.type_name);
        }
        previous
    }

    pub fn get(&self, type_name: &str) -> Option<&NodeTypeDefinition> {
        self.types.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Definitions grouped by category, each group sorted by type name.
    pub fn list_by_category(&self) -> BTreeMap<NodeCategory, Vec<&NodeTypeDefinition>> {
        let mut groups: BTreeMap<NodeCategory, Vec<&NodeTypeDefinition>> = BTreeMap::new();
        for def in self.types.values() {
            groups.entry(def.category).or_default().push(def);
        }
        for defs in groups.values_mut() {
            defs.sort_by(|a, b| a.type_name.cmp(&b.type_name));
        }
        groups
    }

    /// Build a new instance of `type_name`: default params overlaid with `overrides`.
    pub fn create_node(
        &self,
        type_name: &str,
        overrides: ParamMap,
    ) -> Result<NodeInstance, GraphError> {
        let def = self
            .get(type_name)
            .ok_or_else(|| GraphError::UnknownNodeType(type_name.to_string()))?;
        let mut params = def.default_params.clone();
        params.extend(overrides);
        Ok(NodeInstance::new(type_name, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::evaluation::{EvalError, EvaluationContext};
    use crate::model::value::{OutputMap, Value};

    fn no_outputs(_ctx: &EvaluationContext) -> Result<OutputMap, EvalError> {
        Ok(OutputMap::new())
    }

    fn noop(type_name: &str, category: NodeCategory) -> NodeTypeDefinition {
        NodeTypeDefinition::new(type_name, type_name, category, no_outputs)
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = NodeRegistry::new();
        assert!(registry.register(noop("test.a", NodeCategory::Custom)).is_none());
        assert!(registry.get("test.a").is_some());
        assert!(registry.get("test.b").is_none());
    }

    #[test]
    fn test_reregistration_replaces() {
        let mut registry = NodeRegistry::new();
        registry.register(noop("test.a", NodeCategory::Custom));
        let previous = registry.register(noop("test.a", NodeCategory::Math));
        assert_eq!(previous.map(|d| d.category), Some(NodeCategory::Custom));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("test.a").unwrap().category, NodeCategory::Math);
    }

    #[test]
    fn test_list_by_category_sorted() {
        let mut registry = NodeRegistry::new();
        registry.register(noop("math.b", NodeCategory::Math));
        registry.register(noop("math.a", NodeCategory::Math));
        registry.register(noop("data.x", NodeCategory::Data));

        let groups = registry.list_by_category();
        let math: Vec<&str> = groups[&NodeCategory::Math]
            .iter()
            .map(|d| d.type_name.as_str())
            .collect();
        assert_eq!(math, vec!["math.a", "math.b"]);
        assert_eq!(groups.keys().next(), Some(&NodeCategory::Data));
    }

    #[test]
    fn test_create_node_merges_defaults() {
        let registry = NodeRegistry::with_builtin_nodes();
        let mut overrides = ParamMap::new();
        overrides.insert("radius".to_string(), Value::Number(30.0));

        let node = registry.create_node("shape.circle", overrides).unwrap();
        assert_eq!(node.param("radius"), Some(&Value::Number(30.0)));
        assert!(node.param("color").is_some());

        assert_eq!(
            registry.create_node("shape.blob", ParamMap::new()),
            Err(GraphError::UnknownNodeType("shape.blob".to_string()))
        );
    }
}
