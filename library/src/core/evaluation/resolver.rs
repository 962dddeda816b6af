//! Dependency resolution and cycle detection.

use std::collections::HashMap;

use uuid::Uuid;

use super::error::EvalError;
use super::index::GraphIndex;

/// Per-node traversal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitState {
    #[default]
    Unvisited,
    /// On the current dependency path; reaching it again closes a cycle.
    Visiting,
    Done,
}

/// Tracks visit states and the active path during one traversal.
#[derive(Debug, Default)]
pub struct VisitTracker {
    states: HashMap<Uuid, VisitState>,
    path: Vec<Uuid>,
}

impl VisitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, node_id: Uuid) -> VisitState {
        self.states.get(&node_id).copied().unwrap_or_default()
    }

    /// Mark `node_id` as being visited.
    ///
    /// Fails with `CycleDetected` if it is already on the active path; the
    /// reported path runs from the first occurrence back to `node_id`.
    pub fn enter(&mut self, node_id: Uuid) -> Result<(), EvalError> {
        if self.state(node_id) == VisitState::Visiting {
            let start = self
                .path
                .iter()
                .position(|id| *id == node_id)
                .unwrap_or(0);
            let mut path = self.path[start..].to_vec();
            path.push(node_id);
            return Err(EvalError::CycleDetected { path });
        }
        self.states.insert(node_id, VisitState::Visiting);
        self.path.push(node_id);
        Ok(())
    }

    pub fn finish(&mut self, node_id: Uuid) {
        self.states.insert(node_id, VisitState::Done);
        if self.path.last() == Some(&node_id) {
            self.path.pop();
        }
    }
}

/// Dependency closure of `target` in evaluation order (dependencies first).
///
/// Follows every incoming edge, so this runs before any node evaluates and
/// rejects cycles up front. Nodes missing from `exists` fail with
/// `NodeNotFound`.
pub fn dependency_order(
    index: &GraphIndex,
    exists: impl Fn(Uuid) -> bool,
    target: Uuid,
) -> Result<Vec<Uuid>, EvalError> {
    let mut tracker = VisitTracker::new();
    let mut order = Vec::new();
    visit(index, &exists, target, &mut tracker, &mut order)?;
    Ok(order)
}

fn visit(
    index: &GraphIndex,
    exists: &impl Fn(Uuid) -> bool,
    node_id: Uuid,
    tracker: &mut VisitTracker,
    order: &mut Vec<Uuid>,
) -> Result<(), EvalError> {
    if tracker.state(node_id) == VisitState::Done {
        return Ok(());
    }
    if !exists(node_id) {
        return Err(EvalError::NodeNotFound { node_id });
    }
    tracker.enter(node_id)?;
    for edge in index.incoming(node_id) {
        visit(index, exists, edge.from.node_id, tracker, order)?;
    }
    tracker.finish(node_id);
    order.push(node_id);
    Ok(())
}
