//! Editing session: a graph, its node registry and the evaluation cache.

use std::path::Path;
use std::sync::Arc;

use log::debug;
use uuid::Uuid;

use crate::core::evaluation::{EvalEngine, EvalError, GraphIndex, NodeCache};
use crate::error::{GraphError, LibraryError};
use crate::model::graph::{ConnectOutcome, Edge, Graph, NodeInstance, PortRef};
use crate::model::value::{OutputMap, ParamMap, Value};
use crate::plugin::NodeRegistry;

/// Owns a [`Graph`] and keeps the node cache consistent with it.
///
/// Every mutation invalidates the affected node and everything downstream
/// of it before the next evaluation can observe a stale result.
pub struct GraphEditor {
    registry: Arc<NodeRegistry>,
    graph: Graph,
    cache: NodeCache,
}

impl GraphEditor {
    pub fn new(registry: Arc<NodeRegistry>) -> Self {
        Self {
            registry,
            graph: Graph::new(),
            cache: NodeCache::new(),
        }
    }

    /// Start a session on an existing graph after checking it against the registry.
    pub fn from_graph(registry: Arc<NodeRegistry>, graph: Graph) -> Result<Self, GraphError> {
        graph.validate(&registry)?;
        Ok(Self {
            registry,
            graph,
            cache: NodeCache::new(),
        })
    }

    pub fn load(registry: Arc<NodeRegistry>, path: impl AsRef<Path>) -> Result<Self, LibraryError> {
        let graph = Graph::load(&std::fs::read_to_string(path)?)?;
        Ok(Self::from_graph(registry, graph)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LibraryError> {
        std::fs::write(path, self.graph.save()?)?;
        Ok(())
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &NodeCache {
        &self.cache
    }

    /// Instantiate `type_name` with its default parameters overlaid by `overrides`.
    pub fn add_node(&mut self, type_name: &str, overrides: ParamMap) -> Result<Uuid, GraphError> {
        let node = self.registry.create_node(type_name, overrides)?;
        self.graph.add_node(node)
    }

    pub fn remove_node(&mut self, node_id: Uuid) -> Result<NodeInstance, GraphError> {
        if !self.graph.contains_node(node_id) {
            return Err(GraphError::NodeNotFound(node_id));
        }
        // Downstream is only reachable while the node's edges still exist.
        self.invalidate(node_id);
        self.graph.remove_node(node_id)
    }

    pub fn set_param(
        &mut self,
        node_id: Uuid,
        key: &str,
        value: Value,
    ) -> Result<Option<Value>, GraphError> {
        let previous = self.graph.set_param(node_id, key, value)?;
        self.invalidate(node_id);
        Ok(previous)
    }

    /// Connect `from` (an output port) to `to` (an input port).
    ///
    /// Port kinds are not compared; a mismatch surfaces as `TypeMismatch`
    /// when the target evaluates.
    pub fn connect(&mut self, from: PortRef, to: PortRef) -> Result<ConnectOutcome, GraphError> {
        self.check_port(&from, false)?;
        self.check_port(&to, true)?;
        let target = to.node_id;
        let outcome = self.graph.connect(from, to)?;
        self.invalidate(target);
        Ok(outcome)
    }

    pub fn disconnect(&mut self, edge_id: Uuid) -> Result<Edge, GraphError> {
        let edge = self.graph.disconnect(edge_id)?;
        self.invalidate(edge.to.node_id);
        Ok(edge)
    }

    /// Drop cached results of `node_id` and its downstream nodes.
    pub fn invalidate(&mut self, node_id: Uuid) -> Vec<Uuid> {
        let index = GraphIndex::new(&self.graph.edges);
        self.cache.invalidate(node_id, &index)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Evaluate `target` with the cycle pre-pass.
    pub fn evaluate(&mut self, target: Uuid) -> Result<OutputMap, EvalError> {
        self.with_engine(|engine| engine.evaluate(target))
    }

    /// Evaluate a single node against the shared cache.
    pub fn evaluate_one(&mut self, node_id: Uuid) -> Result<OutputMap, EvalError> {
        self.with_engine(|engine| engine.evaluate_one(node_id))
    }

    fn with_engine(
        &mut self,
        run: impl FnOnce(&mut EvalEngine) -> Result<OutputMap, EvalError>,
    ) -> Result<OutputMap, EvalError> {
        let cache = std::mem::take(&mut self.cache);
        let mut engine = EvalEngine::from_graph(&self.registry, &self.graph, cache);
        let result = run(&mut engine);
        self.cache = engine.into_cache();
        debug!("GraphEditor: {} cached nodes after pass", self.cache.len());
        result
    }

    fn check_port(&self, port: &PortRef, input: bool) -> Result<(), GraphError> {
        let node = self
            .graph
            .node(port.node_id)
            .ok_or(GraphError::NodeNotFound(port.node_id))?;
        let def = self
            .registry
            .get(&node.type_name)
            .ok_or_else(|| GraphError::UnknownNodeType(node.type_name.clone()))?;
        let declared = if input {
            def.input(&port.port).is_some()
        } else {
            def.output(&port.port).is_some()
        };
        if !declared {
            return Err(GraphError::UnknownPort {
                node_id: port.node_id,
                port: port.port.clone(),
                direction: if input { "input" } else { "output" },
            });
        }
        Ok(())
    }
}
