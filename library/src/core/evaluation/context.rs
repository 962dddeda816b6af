//! The read-only view a node evaluator works against.

use std::collections::HashMap;

use uuid::Uuid;

use super::error::EvalError;
use crate::model::color::Color;
use crate::model::value::{Layer, ParamMap, Value, ValueKind, Vec2};
use crate::plugin::node_types::NodeTypeDefinition;

/// Input values collected from incoming edges, keyed by input port id.
pub type InputMap = HashMap<String, Value>;

/// Context for a single node evaluation.
///
/// Typed accessors resolve a port in this order: the connected input (which
/// must have the requested kind), then the node's own parameter of the same
/// id, then `MissingInput`.
pub struct EvaluationContext<'a> {
    node_id: Uuid,
    definition: &'a NodeTypeDefinition,
    params: &'a ParamMap,
    inputs: InputMap,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(
        node_id: Uuid,
        definition: &'a NodeTypeDefinition,
        params: &'a ParamMap,
        inputs: InputMap,
    ) -> Self {
        Self {
            node_id,
            definition,
            params,
            inputs,
        }
    }

    pub fn node_id(&self) -> Uuid {
        self.node_id
    }

    pub fn definition(&self) -> &NodeTypeDefinition {
        self.definition
    }

    /// Raw lookup of a connected input.
    pub fn get_input(&self, port: &str) -> Option<&Value> {
        self.inputs.get(port)
    }

    /// True only if an edge supplies `port`.
    pub fn has_input(&self, port: &str) -> bool {
        self.inputs.contains_key(port)
    }

    pub fn params(&self) -> &ParamMap {
        self.params
    }

    /// Connected input first, then the parameter of the same id.
    fn resolve(&self, port: &str) -> Result<&Value, EvalError> {
        self.inputs
            .get(port)
            .or_else(|| self.params.get(port))
            .ok_or_else(|| EvalError::MissingInput {
                node_id: self.node_id,
                port: port.to_string(),
            })
    }

    fn mismatch(&self, port: &str, expected: ValueKind, found: &Value) -> EvalError {
        EvalError::TypeMismatch {
            node_id: self.node_id,
            port: port.to_string(),
            expected,
            found: found.kind(),
        }
    }

    /// Resolve `port` to a value of kind `expected`.
    pub fn get_value(&self, port: &str, expected: ValueKind) -> Result<&Value, EvalError> {
        let value = self.resolve(port)?;
        if value.kind() != expected {
            return Err(self.mismatch(port, expected, value));
        }
        Ok(value)
    }

    pub fn get_number(&self, port: &str) -> Result<f32, EvalError> {
        match self.resolve(port)? {
            Value::Number(n) => Ok(*n),
            other => Err(self.mismatch(port, ValueKind::Number, other)),
        }
    }

    pub fn get_color(&self, port: &str) -> Result<Color, EvalError> {
        match self.resolve(port)? {
            Value::Color(c) => Ok(*c),
            other => Err(self.mismatch(port, ValueKind::Color, other)),
        }
    }

    pub fn get_boolean(&self, port: &str) -> Result<bool, EvalError> {
        match self.resolve(port)? {
            Value::Boolean(b) => Ok(*b),
            other => Err(self.mismatch(port, ValueKind::Boolean, other)),
        }
    }

    pub fn get_string(&self, port: &str) -> Result<&str, EvalError> {
        match self.resolve(port)? {
            Value::String(s) => Ok(s),
            other => Err(self.mismatch(port, ValueKind::String, other)),
        }
    }

    pub fn get_vector2(&self, port: &str) -> Result<Vec2, EvalError> {
        match self.resolve(port)? {
            Value::Vector2(v) => Ok(*v),
            other => Err(self.mismatch(port, ValueKind::Vector2, other)),
        }
    }

    /// Resolve an option value and check it against the port's declared option set.
    pub fn get_option(&self, port: &str) -> Result<&str, EvalError> {
        let name = match self.resolve(port)? {
            Value::Option(name) => name.as_str(),
            other => return Err(self.mismatch(port, ValueKind::Option, other)),
        };
        let allowed = self
            .definition
            .input(port)
            .map_or(true, |p| p.options.is_empty() || p.options.iter().any(|o| o == name));
        if !allowed {
            return Err(self.fail(format!("'{}' is not a valid option for '{}'", name, port)));
        }
        Ok(name)
    }

    pub fn get_layer(&self, port: &str) -> Result<&Layer, EvalError> {
        match self.resolve(port)? {
            Value::Layer(layer) => Ok(layer),
            other => Err(self.mismatch(port, ValueKind::Layer, other)),
        }
    }

    /// Like [`get_layer`](Self::get_layer), but an absent port yields `None`.
    pub fn try_layer(&self, port: &str) -> Result<Option<&Layer>, EvalError> {
        match self.get_layer(port) {
            Ok(layer) => Ok(Some(layer)),
            Err(EvalError::MissingInput { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// An `EvaluationFailed` error attributed to this node.
    pub fn fail(&self, message: impl Into<String>) -> EvalError {
        EvalError::EvaluationFailed {
            node_id: self.node_id,
            message: message.into(),
        }
    }
}
