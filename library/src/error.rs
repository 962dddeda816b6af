use thiserror::Error;
use uuid::Uuid;

use crate::core::evaluation::EvalError;
use crate::model::raster::RasterError;

/// Errors raised while editing or loading a graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(Uuid),
    #[error("Node {0} already exists")]
    DuplicateNode(Uuid),
    #[error("Edge {0} not found")]
    EdgeNotFound(Uuid),
    #[error("Cannot connect node {0} to itself")]
    SelfConnection(Uuid),
    #[error("Unknown node type '{0}'")]
    UnknownNodeType(String),
    #[error("Node {node_id} has no {direction} port '{port}'")]
    UnknownPort {
        node_id: Uuid,
        port: String,
        direction: &'static str,
    },
    #[error("Input port {node_id}.{port} has more than one incoming edge")]
    DuplicateInput { node_id: Uuid, port: String },
}

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvalError),
    #[error("Raster error: {0}")]
    Raster(#[from] RasterError),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LibraryError {
    pub fn config(msg: impl Into<String>) -> Self {
        LibraryError::Config(msg.into())
    }
}
