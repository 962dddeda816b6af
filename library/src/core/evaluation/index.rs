//! Adjacency indices over a snapshot of graph edges.

use std::collections::{HashMap, HashSet, VecDeque};

use uuid::Uuid;

use crate::model::graph::Edge;

/// Incoming edges by target node and outgoing edges by source node.
#[derive(Debug, Default, Clone)]
pub struct GraphIndex {
    incoming: HashMap<Uuid, Vec<Edge>>,
    outgoing: HashMap<Uuid, Vec<Edge>>,
}

impl GraphIndex {
    pub fn new(edges: &[Edge]) -> Self {
        let mut index = Self::default();
        for edge in edges {
            index
                .incoming
                .entry(edge.to.node_id)
                .or_default()
                .push(edge.clone());
            index
                .outgoing
                .entry(edge.from.node_id)
                .or_default()
                .push(edge.clone());
        }
        index
    }

    pub fn incoming(&self, node_id: Uuid) -> &[Edge] {
        self.incoming.get(&node_id).map_or(&[], Vec::as_slice)
    }

    pub fn outgoing(&self, node_id: Uuid) -> &[Edge] {
        self.outgoing.get(&node_id).map_or(&[], Vec::as_slice)
    }

    /// The edge feeding `port` on `node_id`.
    ///
    /// If a snapshot holds more than one (only possible in hand-built edge
    /// lists), the last one wins, matching replace-on-connect.
    pub fn incoming_edge(&self, node_id: Uuid, port: &str) -> Option<&Edge> {
        self.incoming(node_id).iter().rev().find(|e| e.to.port == port)
    }

    /// `node_id` plus every node reachable from it along outgoing edges.
    pub fn downstream_closure(&self, node_id: Uuid) -> Vec<Uuid> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([node_id]);

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            order.push(current);
            for edge in self.outgoing(current) {
                queue.push_back(edge.to.node_id);
            }
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::graph::PortRef;

    fn edge(from: Uuid, to: Uuid, port: &str) -> Edge {
        Edge::new(PortRef::new(from, "out"), PortRef::new(to, port))
    }

    #[test]
    fn test_downstream_closure_follows_fan_out() {
        let ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        let edges = vec![
            edge(ids[0], ids[1], "a"),
            edge(ids[0], ids[2], "a"),
            edge(ids[2], ids[3], "a"),
        ];
        let index = GraphIndex::new(&edges);

        let closure: HashSet<Uuid> = index.downstream_closure(ids[0]).into_iter().collect();
        assert_eq!(closure, HashSet::from([ids[0], ids[1], ids[2], ids[3]]));
        assert_eq!(index.downstream_closure(ids[4]), vec![ids[4]]);
    }

    #[test]
    fn test_downstream_closure_terminates_on_cycle() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let index = GraphIndex::new(&[edge(a, b, "x"), edge(b, a, "x")]);
        assert_eq!(index.downstream_closure(a), vec![a, b]);
    }

    #[test]
    fn test_incoming_edge_by_port() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let index = GraphIndex::new(&[edge(a, b, "x")]);
        assert!(index.incoming_edge(b, "x").is_some());
        assert!(index.incoming_edge(b, "y").is_none());
        assert_eq!(index.outgoing(a).len(), 1);
        assert!(index.incoming(a).is_empty());
    }
}
