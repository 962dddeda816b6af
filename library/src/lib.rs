pub mod config;
pub mod core;
pub mod editor;
pub mod error;
pub mod io;
pub mod model;
pub mod plugin;
pub mod util;

pub use config::RenderConfig;
pub use crate::core::evaluation::{EvalEngine, EvalError, EvaluationContext, NodeCache, evaluate};
pub use editor::GraphEditor;
pub use error::{GraphError, LibraryError};
pub use model::{
    BlendMode, Color, Edge, Graph, Layer, NodeInstance, OutputMap, ParamMap, PortRef, Raster,
    Value, ValueKind, Vec2,
};
pub use plugin::{NodeCategory, NodeEvaluator, NodeRegistry, NodeTypeDefinition, PortDefinition};

use std::sync::Arc;

use crate::util::timing::ScopedTimer;

/// Evaluate the sink chosen by `config` and return its layer, flattened onto
/// `config.background` when one is set.
pub fn render(editor: &mut GraphEditor, config: &RenderConfig) -> Result<Layer, LibraryError> {
    let _timer = ScopedTimer::info("render");
    let sink = config.resolve_sink(editor.graph())?;
    let outputs = editor.evaluate(sink)?;
    let layer = outputs
        .get(&config.sink_port)
        .and_then(Value::as_layer)
        .cloned()
        .ok_or_else(|| {
            LibraryError::config(format!(
                "sink {} has no layer output '{}'",
                sink, config.sink_port
            ))
        })?;

    match config.background {
        Some(color) if !color.is_transparent() => {
            let mut flat = Raster::filled(layer.width(), layer.height(), color);
            flat.blend_over(&layer, 0, 0, 1.0, BlendMode::Normal);
            Ok(Arc::new(flat))
        }
        _ => Ok(layer),
    }
}
