//! Pull-based evaluation of a graph snapshot.

use std::collections::HashMap;

use log::debug;
use uuid::Uuid;

use super::cache::NodeCache;
use super::context::{EvaluationContext, InputMap};
use super::error::EvalError;
use super::index::GraphIndex;
use super::resolver::{self, VisitTracker};
use crate::model::graph::{Edge, Graph, NodeInstance};
use crate::model::value::OutputMap;
use crate::plugin::NodeRegistry;
use crate::util::timing::ScopedTimer;

/// Evaluates nodes of one graph snapshot, memoizing results per node.
///
/// The engine indexes the edges it is built with and never sees later edits;
/// callers build a new engine per pass and hand the cache over with
/// [`EvalEngine::with_cache`] / [`EvalEngine::into_cache`].
pub struct EvalEngine<'r> {
    registry: &'r NodeRegistry,
    nodes: HashMap<Uuid, NodeInstance>,
    index: GraphIndex,
    cache: NodeCache,
}

impl<'r> EvalEngine<'r> {
    pub fn new(registry: &'r NodeRegistry, nodes: &[NodeInstance], edges: &[Edge]) -> Self {
        Self::with_cache(registry, nodes, edges, NodeCache::new())
    }

    pub fn with_cache(
        registry: &'r NodeRegistry,
        nodes: &[NodeInstance],
        edges: &[Edge],
        cache: NodeCache,
    ) -> Self {
        Self {
            registry,
            nodes: nodes.iter().map(|n| (n.id, n.clone())).collect(),
            index: GraphIndex::new(edges),
            cache,
        }
    }

    pub fn from_graph(registry: &'r NodeRegistry, graph: &Graph, cache: NodeCache) -> Self {
        Self::with_cache(registry, &graph.nodes, &graph.edges, cache)
    }

    pub fn cache(&self) -> &NodeCache {
        &self.cache
    }

    pub fn into_cache(self) -> NodeCache {
        self.cache
    }

    /// Dependency closure of `target`, dependencies first. Fails on cycles.
    pub fn dependency_order(&self, target: Uuid) -> Result<Vec<Uuid>, EvalError> {
        resolver::dependency_order(&self.index, |id| self.nodes.contains_key(&id), target)
    }

    /// Evaluate the dependency closure of `target` and return its outputs.
    ///
    /// Cycles are rejected by a pre-pass before any node evaluates.
    pub fn evaluate(&mut self, target: Uuid) -> Result<OutputMap, EvalError> {
        let _timer = ScopedTimer::debug_lazy(|| format!("evaluate {}", target));
        let order = self.dependency_order(target)?;
        debug!(
            "EvalEngine: {} nodes in closure of {}, {} cached",
            order.len(),
            target,
            order.iter().filter(|id| self.cache.contains(**id)).count()
        );
        self.evaluate_one(target)
    }

    /// Evaluate a single node against the shared cache.
    ///
    /// Uncached dependencies are evaluated on the way; cycles are caught by
    /// the visit states as they are reached.
    pub fn evaluate_one(&mut self, node_id: Uuid) -> Result<OutputMap, EvalError> {
        let mut pass = Pass {
            registry: self.registry,
            nodes: &self.nodes,
            index: &self.index,
            cache: &mut self.cache,
            tracker: VisitTracker::new(),
        };
        pass.evaluate_node(node_id)
    }

    /// Drop the cache entry for `node_id` and for everything downstream of it.
    pub fn invalidate(&mut self, node_id: Uuid) -> Vec<Uuid> {
        self.cache.invalidate(node_id, &self.index)
    }
}

/// Evaluate `target` in a fresh engine (no prior cache).
pub fn evaluate(
    registry: &NodeRegistry,
    nodes: &[NodeInstance],
    edges: &[Edge],
    target: Uuid,
) -> Result<OutputMap, EvalError> {
    EvalEngine::new(registry, nodes, edges).evaluate(target)
}

/// One recursive walk; borrows the engine's parts separately so node
/// references outlive the mutable cache borrow.
struct Pass<'a> {
    registry: &'a NodeRegistry,
    nodes: &'a HashMap<Uuid, NodeInstance>,
    index: &'a GraphIndex,
    cache: &'a mut NodeCache,
    tracker: VisitTracker,
}

impl<'a> Pass<'a> {
    fn evaluate_node(&mut self, node_id: Uuid) -> Result<OutputMap, EvalError> {
        if let Some(outputs) = self.cache.get(node_id) {
            debug!("EvalEngine: cache hit for {}", node_id);
            return Ok(outputs.clone());
        }
        self.tracker.enter(node_id)?;

        let nodes = self.nodes;
        let registry = self.registry;
        let index = self.index;

        let node = nodes
            .get(&node_id)
            .ok_or(EvalError::NodeNotFound { node_id })?;
        let def = registry
            .get(&node.type_name)
            .ok_or_else(|| EvalError::UnknownNodeType {
                node_id,
                type_name: node.type_name.clone(),
            })?;

        let mut inputs = InputMap::new();
        for port in &def.inputs {
            let Some(edge) = index.incoming_edge(node_id, &port.id) else {
                if port.required && !node.params.contains_key(&port.id) {
                    return Err(EvalError::MissingInput {
                        node_id,
                        port: port.id.clone(),
                    });
                }
                continue;
            };
            let upstream = self.evaluate_node(edge.from.node_id)?;
            let value = upstream
                .get(&edge.from.port)
                .cloned()
                .ok_or_else(|| EvalError::MissingOutput {
                    node_id: edge.from.node_id,
                    port: edge.from.port.clone(),
                })?;
            inputs.insert(port.id.clone(), value);
        }

        debug!("EvalEngine: evaluating {} ({})", node_id, node.type_name);
        let ctx = EvaluationContext::new(node_id, def, &node.params, inputs);
        let outputs = def.evaluate(&ctx)?;

        self.tracker.finish(node_id);
        self.cache.insert(node_id, outputs.clone());
        Ok(outputs)
    }
}
