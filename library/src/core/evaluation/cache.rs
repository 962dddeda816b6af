//! Memoized node outputs.

use std::collections::HashMap;

use log::debug;
use uuid::Uuid;

use super::index::GraphIndex;
use crate::model::value::OutputMap;

/// Evaluation results keyed by node id.
///
/// Entries live until they are invalidated; there is no eviction.
#[derive(Debug, Default, Clone)]
pub struct NodeCache {
    entries: HashMap<Uuid, OutputMap>,
}

impl NodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node_id: Uuid) -> Option<&OutputMap> {
        self.entries.get(&node_id)
    }

    pub fn contains(&self, node_id: Uuid) -> bool {
        self.entries.contains_key(&node_id)
    }

    pub fn insert(&mut self, node_id: Uuid, outputs: OutputMap) {
        self.entries.insert(node_id, outputs);
    }

    pub fn remove(&mut self, node_id: Uuid) -> Option<OutputMap> {
        self.entries.remove(&node_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop `node_id` and everything downstream of it. Returns the ids whose
    /// entries were actually removed.
    pub fn invalidate(&mut self, node_id: Uuid, index: &GraphIndex) -> Vec<Uuid> {
        let dropped: Vec<Uuid> = index
            .downstream_closure(node_id)
            .into_iter()
            .filter(|id| self.entries.remove(id).is_some())
            .collect();
        debug!(
            "NodeCache: invalidated {} entries from node {}",
            dropped.len(),
            node_id
        );
        dropped
    }
}
