//! The editable graph: an ordered list of nodes and the edges between them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::connection::{Edge, PortRef};
use super::node::NodeInstance;
use crate::error::GraphError;
use crate::model::value::Value;
use crate::plugin::NodeRegistry;

/// Result of [`Graph::connect`].
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectOutcome {
    pub edge: Edge,
    /// Edge that previously occupied the target port, if any.
    pub replaced: Option<Edge>,
}

/// Persisted graph record: `{ "nodes": [...], "edges": [...] }`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<NodeInstance>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    pub fn save(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn node(&self, id: Uuid) -> Option<&NodeInstance> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: Uuid) -> Option<&mut NodeInstance> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: Uuid) -> bool {
        self.node(id).is_some()
    }

    pub fn add_node(&mut self, node: NodeInstance) -> Result<Uuid, GraphError> {
        if self.contains_node(node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        let id = node.id;
        self.nodes.push(node);
        Ok(id)
    }

    /// Remove a node together with every edge touching it.
    pub fn remove_node(&mut self, id: Uuid) -> Result<NodeInstance, GraphError> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or(GraphError::NodeNotFound(id))?;
        self.edges.retain(|e| !e.touches(id));
        Ok(self.nodes.remove(index))
    }

    /// Set a parameter on a node, returning the previous value.
    pub fn set_param(
        &mut self,
        node_id: Uuid,
        key: &str,
        value: Value,
    ) -> Result<Option<Value>, GraphError> {
        let node = self
            .node_mut(node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;
        Ok(node.set_param(key, value))
    }

    /// Connect an output port to an input port.
    ///
    /// Each input accepts at most one edge; connecting to an occupied input
    /// replaces the existing edge. Cycles are not rejected here, the
    /// evaluator reports them.
    pub fn connect(&mut self, from: PortRef, to: PortRef) -> Result<ConnectOutcome, GraphError> {
        if from.node_id == to.node_id {
            return Err(GraphError::SelfConnection(from.node_id));
        }
        for id in [from.node_id, to.node_id] {
            if !self.contains_node(id) {
                return Err(GraphError::NodeNotFound(id));
            }
        }

        let replaced = self
            .edges
            .iter()
            .position(|e| e.to == to)
            .map(|i| self.edges.remove(i));

        let edge = Edge::new(from, to);
        self.edges.push(edge.clone());
        Ok(ConnectOutcome { edge, replaced })
    }

    pub fn disconnect(&mut self, edge_id: Uuid) -> Result<Edge, GraphError> {
        let index = self
            .edges
            .iter()
            .position(|e| e.id == edge_id)
            .ok_or(GraphError::EdgeNotFound(edge_id))?;
        Ok(self.edges.remove(index))
    }

    pub fn edge(&self, edge_id: Uuid) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == edge_id)
    }

    /// The edge feeding a specific input port.
    pub fn incoming_edge(&self, to: &PortRef) -> Option<&Edge> {
        self.edges.iter().find(|e| &e.to == to)
    }

    /// Check a loaded graph against the registry.
    ///
    /// Every type name must resolve, edge endpoints must exist, and no input
    /// may have more than one incoming edge.
    pub fn validate(&self, registry: &NodeRegistry) -> Result<(), GraphError> {
        let mut ids = HashSet::new();
        for node in &self.nodes {
            if !ids.insert(node.id) {
                return Err(GraphError::DuplicateNode(node.id));
            }
            if !registry.contains(&node.type_name) {
                return Err(GraphError::UnknownNodeType(node.type_name.clone()));
            }
        }

        let mut targets = HashSet::new();
        for edge in &self.edges {
            if edge.from.node_id == edge.to.node_id {
                return Err(GraphError::SelfConnection(edge.from.node_id));
            }
            for id in [edge.from.node_id, edge.to.node_id] {
                if !ids.contains(&id) {
                    return Err(GraphError::NodeNotFound(id));
                }
            }
            if !targets.insert(&edge.to) {
                return Err(GraphError::DuplicateInput {
                    node_id: edge.to.node_id,
                    port: edge.to.port.clone(),
                });
            }
        }
        Ok(())
    }
}
