//! Render settings for the command-line front end.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LibraryError;
use crate::model::color::Color;
use crate::model::graph::Graph;

/// Which node to render and where the result goes.
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub output_path: PathBuf,
    /// Explicit sink node. Takes precedence over `sink_type`.
    pub sink: Option<Uuid>,
    pub sink_type: String,
    /// Output port of the sink that holds the layer.
    pub sink_port: String,
    /// Flatten the result onto this color before export.
    pub background: Option<Color>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("result.png"),
            sink: None,
            sink_type: "output.display".to_string(),
            sink_port: "image".to_string(),
            background: None,
        }
    }
}

impl RenderConfig {
    pub fn from_json(json: &str) -> Result<Self, LibraryError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LibraryError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Pick the node to render from `graph`.
    ///
    /// Without an explicit `sink`, exactly one node of `sink_type` must exist.
    pub fn resolve_sink(&self, graph: &Graph) -> Result<Uuid, LibraryError> {
        if let Some(id) = self.sink {
            if !graph.contains_node(id) {
                return Err(LibraryError::config(format!("sink node {} is not in the graph", id)));
            }
            return Ok(id);
        }

        let mut sinks = graph
            .nodes
            .iter()
            .filter(|n| n.type_name == self.sink_type)
            .map(|n| n.id);
        match (sinks.next(), sinks.next()) {
            (Some(id), None) => Ok(id),
            (None, _) => Err(LibraryError::config(format!(
                "graph has no '{}' node",
                self.sink_type
            ))),
            (Some(_), Some(_)) => Err(LibraryError::config(format!(
                "graph has several '{}' nodes; set `sink` to choose one",
                self.sink_type
            ))),
        }
    }
}
