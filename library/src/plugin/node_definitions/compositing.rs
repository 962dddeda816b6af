use super::{inp, node, out, single};
use crate::core::evaluation::{EvalError, EvaluationContext};
use crate::model::color::BlendMode;
use crate::model::raster::Raster;
use crate::model::value::{OutputMap, Value, ValueKind, Vec2};
use crate::plugin::node_types::{NodeCategory, NodeTypeDefinition};

pub(super) fn compositing_nodes() -> Vec<NodeTypeDefinition> {
    let nc = NodeCategory::Compositing;
    vec![
        node("compositing.blend", "Blend", nc, blend)
            .with_description("Composite foreground over background; output covers both")
            .with_inputs(vec![
                inp("foreground", "Foreground", ValueKind::Layer).required(),
                inp("background", "Background", ValueKind::Layer).required(),
                inp("opacity", "Opacity", ValueKind::Number),
                inp("mode", "Mode", ValueKind::Option).with_options(&BlendMode::OPTIONS),
            ])
            .with_outputs(vec![out("layer", "Layer", ValueKind::Layer)])
            .with_param("opacity", 1.0)
            .with_param("mode", Value::option(BlendMode::Normal.as_str())),
        node("compositing.translate", "Translate", nc, translate)
            .with_description("Shift pixels by a whole-pixel offset, cropping to the layer bounds")
            .with_inputs(vec![
                inp("layer", "Layer", ValueKind::Layer).required(),
                inp("offset", "Offset", ValueKind::Vector2),
            ])
            .with_outputs(vec![out("layer", "Layer", ValueKind::Layer)])
            .with_param("offset", Vec2::ZERO),
    ]
}

fn blend(ctx: &EvaluationContext) -> Result<OutputMap, EvalError> {
    let foreground = ctx.get_layer("foreground")?;
    let background = ctx.get_layer("background")?;
    let opacity = ctx.get_number("opacity")?;
    let mode_name = ctx.get_option("mode")?;
    let mode = BlendMode::parse(mode_name)
        .ok_or_else(|| ctx.fail(format!("unknown blend mode '{}'", mode_name)))?;

    let mut raster = Raster::new(
        foreground.width().max(background.width()),
        foreground.height().max(background.height()),
    );
    raster.blend_over(background, 0, 0, 1.0, BlendMode::Normal);
    raster.blend_over(foreground, 0, 0, opacity, mode);
    Ok(single("layer", raster))
}

fn translate(ctx: &EvaluationContext) -> Result<OutputMap, EvalError> {
    let layer = ctx.get_layer("layer")?;
    let offset = ctx.get_vector2("offset")?;

    let mut raster = Raster::new(layer.width(), layer.height());
    raster.blend_over(
        layer,
        offset.x.round() as i32,
        offset.y.round() as i32,
        1.0,
        BlendMode::Normal,
    );
    Ok(single("layer", raster))
}
