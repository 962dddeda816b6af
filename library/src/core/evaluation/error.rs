use thiserror::Error;
use uuid::Uuid;

use crate::model::value::ValueKind;

/// A structured evaluation failure, attributed to the node that raised it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Node {node_id} has unknown type '{type_name}'")]
    UnknownNodeType { node_id: Uuid, type_name: String },
    #[error("Node {node_id} not found")]
    NodeNotFound { node_id: Uuid },
    #[error("Node {node_id} is missing input '{port}'")]
    MissingInput { node_id: Uuid, port: String },
    #[error("Node {node_id} input '{port}' expects {expected}, got {found}")]
    TypeMismatch {
        node_id: Uuid,
        port: String,
        expected: ValueKind,
        found: ValueKind,
    },
    /// The dependency `node_id` did not produce the output `port` an edge reads from.
    #[error("Node {node_id} did not produce output '{port}'")]
    MissingOutput { node_id: Uuid, port: String },
    /// `path` starts and ends with the node that closes the loop.
    #[error("Cycle detected: {}", format_path(path))]
    CycleDetected { path: Vec<Uuid> },
    #[error("Node {node_id} failed: {message}")]
    EvaluationFailed { node_id: Uuid, message: String },
}

impl EvalError {
    /// The node the error is attributed to.
    pub fn node_id(&self) -> Option<Uuid> {
        match self {
            EvalError::UnknownNodeType { node_id, .. }
            | EvalError::NodeNotFound { node_id }
            | EvalError::MissingInput { node_id, .. }
            | EvalError::TypeMismatch { node_id, .. }
            | EvalError::MissingOutput { node_id, .. }
            | EvalError::EvaluationFailed { node_id, .. } => Some(*node_id),
            EvalError::CycleDetected { path } => path.first().copied(),
        }
    }

    /// The port involved, where the error concerns one.
    pub fn port(&self) -> Option<&str> {
        match self {
            EvalError::MissingInput { port, .. }
            | EvalError::TypeMismatch { port, .. }
            | EvalError::MissingOutput { port, .. } => Some(port),
            _ => None,
        }
    }
}

fn format_path(path: &[Uuid]) -> String {
    path.iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribution() {
        let id = Uuid::new_v4();
        let err = EvalError::TypeMismatch {
            node_id: id,
            port: "color".to_string(),
            expected: ValueKind::Color,
            found: ValueKind::Number,
        };
        assert_eq!(err.node_id(), Some(id));
        assert_eq!(err.port(), Some("color"));
        assert!(err.to_string().contains("expects color, got number"));
    }

    #[test]
    fn test_cycle_message_lists_path() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let err = EvalError::CycleDetected { path: vec![a, b, a] };
        assert_eq!(err.node_id(), Some(a));
        assert_eq!(err.port(), None);
        assert_eq!(err.to_string(), format!("Cycle detected: {a} -> {b} -> {a}"));
    }
}
