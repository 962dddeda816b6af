use super::{inp, node, out, single};
use crate::core::evaluation::{EvalError, EvaluationContext};
use crate::model::color::Color;
use crate::model::raster::Raster;
use crate::model::value::{OutputMap, ValueKind};
use crate::plugin::node_types::{NodeCategory, NodeTypeDefinition};

pub(super) fn color_nodes() -> Vec<NodeTypeDefinition> {
    use ValueKind::{Color as ColorKind, Layer, Number};
    let nc = NodeCategory::Color;
    vec![
        node("color.mix", "Mix Colors", nc, mix)
            .with_description("Linear interpolation between two colors")
            .with_inputs(vec![
                inp("a", "A", ColorKind),
                inp("b", "B", ColorKind),
                inp("factor", "Factor", Number),
            ])
            .with_outputs(vec![out("color", "Color", ColorKind)])
            .with_param("a", Color::BLACK)
            .with_param("b", Color::WHITE)
            .with_param("factor", 0.5),
        node("color.rgba", "RGBA", nc, rgba)
            .with_description("Build a color from channel values in 0..=255")
            .with_inputs(vec![
                inp("r", "R", Number),
                inp("g", "G", Number),
                inp("b", "B", Number),
                inp("a", "A", Number),
            ])
            .with_outputs(vec![out("color", "Color", ColorKind)])
            .with_param("r", 0.0)
            .with_param("g", 0.0)
            .with_param("b", 0.0)
            .with_param("a", 255.0),
        node("color.tint", "Tint", nc, tint)
            .with_description("Replace the color of every pixel, keeping coverage")
            .with_inputs(vec![
                inp("layer", "Layer", Layer).required(),
                inp("color", "Color", ColorKind),
            ])
            .with_outputs(vec![out("layer", "Layer", Layer)])
            .with_param("color", Color::WHITE),
    ]
}

fn mix(ctx: &EvaluationContext) -> Result<OutputMap, EvalError> {
    let a = ctx.get_color("a")?;
    let b = ctx.get_color("b")?;
    let factor = ctx.get_number("factor")?;
    Ok(single("color", a.lerp(b, factor)))
}

fn rgba(ctx: &EvaluationContext) -> Result<OutputMap, EvalError> {
    let channel = |port: &str| -> Result<u8, EvalError> {
        Ok(ctx.get_number(port)?.round().clamp(0.0, 255.0) as u8)
    };
    let color = Color::new(channel("r")?, channel("g")?, channel("b")?, channel("a")?);
    Ok(single("color", color))
}

fn tint(ctx: &EvaluationContext) -> Result<OutputMap, EvalError> {
    let layer = ctx.get_layer("layer")?;
    let color = ctx.get_color("color")?;

    let mut tinted = Raster::new(layer.width(), layer.height());
    for (x, y, src) in layer.pixels() {
        // Scale the tint alpha by the source coverage.
        let alpha = (color.a as u16 * src.a as u16 / 255) as u8;
        if alpha > 0 {
            tinted.set_pixel(x as i32, y as i32, Color { a: alpha, ..color });
        }
    }
    Ok(single("layer", tinted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::evaluation::evaluate;
    use crate::model::graph::{Edge, PortRef};
    use crate::model::value::{ParamMap, Value};
    use crate::plugin::NodeRegistry;

    #[test]
    fn test_mix_halfway() {
        let registry = NodeRegistry::with_builtin_nodes();
        let node = registry.create_node("color.mix", ParamMap::new()).unwrap();
        let outputs = evaluate(&registry, &[node.clone()], &[], node.id).unwrap();
        assert_eq!(
            outputs["color"].as_color(),
            Some(Color::new(128, 128, 128, 255))
        );
    }

    #[test]
    fn test_rgba_clamps_channels() {
        let registry = NodeRegistry::with_builtin_nodes();
        let overrides = ParamMap::from([
            ("r".to_string(), Value::Number(300.0)),
            ("g".to_string(), Value::Number(-5.0)),
            ("b".to_string(), Value::Number(10.4)),
        ]);
        let node = registry.create_node("color.rgba", overrides).unwrap();
        let outputs = evaluate(&registry, &[node.clone()], &[], node.id).unwrap();
        assert_eq!(outputs["color"].as_color(), Some(Color::new(255, 0, 10, 255)));
    }

    #[test]
    fn test_tint_keeps_coverage() {
        let registry = NodeRegistry::with_builtin_nodes();
        let rect = registry
            .create_node(
                "shape.rectangle",
                ParamMap::from([
                    ("width".to_string(), Value::Number(2.0)),
                    ("height".to_string(), Value::Number(1.0)),
                ]),
            )
            .unwrap();
        let green = Color::rgb(0, 255, 0);
        let tint = registry
            .create_node(
                "color.tint",
                ParamMap::from([("color".to_string(), Value::Color(green))]),
            )
            .unwrap();
        let edges = [Edge::new(
            PortRef::new(rect.id, "layer"),
            PortRef::new(tint.id, "layer"),
        )];

        let outputs = evaluate(&registry, &[rect, tint.clone()], &edges, tint.id).unwrap();
        let layer = outputs["layer"].as_layer().unwrap();
        assert_eq!(layer.pixel_count(), 2);
        assert_eq!(layer.get_pixel(1, 0), Some(green));
    }

    #[test]
    fn test_tint_requires_layer() {
        let registry = NodeRegistry::with_builtin_nodes();
        let node = registry.create_node("color.tint", ParamMap::new()).unwrap();
        let err = evaluate(&registry, &[node.clone()], &[], node.id).unwrap_err();
        assert_eq!(
            err,
            EvalError::MissingInput {
                node_id: node.id,
                port: "layer".to_string()
            }
        );
    }
}
