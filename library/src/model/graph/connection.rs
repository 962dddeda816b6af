//! Edges of the data-flow graph.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies a specific port on a specific node.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PortRef {
    pub node_id: Uuid,
    pub port: String,
}

impl PortRef {
    pub fn new(node_id: Uuid, port: &str) -> Self {
        Self {
            node_id,
            port: port.to_string(),
        }
    }
}

/// A directed connection from an output port to an input port.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Edge {
    pub id: Uuid,
    /// Source port (output)
    pub from: PortRef,
    /// Destination port (input)
    pub to: PortRef,
}

impl Edge {
    pub fn new(from: PortRef, to: PortRef) -> Self {
        Self {
            id: Uuid::new_v4(),
            from,
            to,
        }
    }

    pub fn touches(&self, node_id: Uuid) -> bool {
        self.from.node_id == node_id || self.to.node_id == node_id
    }
}
