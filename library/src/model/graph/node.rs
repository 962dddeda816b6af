//! Node instances of the data-flow graph.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::value::{ParamMap, Value};

/// One node placed in the graph.
///
/// `type_name` references a `NodeTypeDefinition` in the `NodeRegistry`.
/// `params` holds the user-editable values, which double as the fallback for
/// input ports that have no incoming edge.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NodeInstance {
    pub id: Uuid,
    pub type_name: String,
    #[serde(default)]
    pub params: ParamMap,
}

impl NodeInstance {
    pub fn new(type_name: &str, params: ParamMap) -> Self {
        Self::new_with_id(Uuid::new_v4(), type_name, params)
    }

    pub fn new_with_id(id: Uuid, type_name: &str, params: ParamMap) -> Self {
        Self {
            id,
            type_name: type_name.to_string(),
            params,
        }
    }

    pub fn param(&self, id: &str) -> Option<&Value> {
        self.params.get(id)
    }

    /// Set a parameter, returning the previous value.
    pub fn set_param(&mut self, id: &str, value: Value) -> Option<Value> {
        self.params.insert(id.to_string(), value)
    }
}
