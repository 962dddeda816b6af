use super::{inp, node, out, single};
use crate::core::evaluation::{EvalError, EvaluationContext};
use crate::model::color::{BlendMode, Color};
use crate::model::raster::Raster;
use crate::model::value::{OutputMap, Value, ValueKind};
use crate::plugin::node_types::{NodeCategory, NodeTypeDefinition};

pub(super) fn output_nodes() -> Vec<NodeTypeDefinition> {
    vec![
        node("output.display", "Display", NodeCategory::Output, display)
            .with_description("Final image sink, optionally flattened onto a background")
            .with_inputs(vec![
                inp("layer", "Layer", ValueKind::Layer).required(),
                inp("background", "Background", ValueKind::Color),
            ])
            .with_outputs(vec![out("image", "Image", ValueKind::Layer)])
            .with_param("background", Color::TRANSPARENT),
    ]
}

fn display(ctx: &EvaluationContext) -> Result<OutputMap, EvalError> {
    let layer = ctx.get_layer("layer")?;
    let background = ctx.get_color("background")?;
    if background.is_transparent() {
        return Ok(single("image", Value::Layer(layer.clone())));
    }

    let mut image = Raster::filled(layer.width(), layer.height(), background);
    image.blend_over(layer, 0, 0, 1.0, BlendMode::Normal);
    Ok(single("image", image))
}
