//! Shape and pattern generators. Each allocates a fresh layer.

use super::{inp, node, out, single};
use crate::core::evaluation::{EvalError, EvaluationContext};
use crate::model::color::Color;
use crate::model::raster::{MAX_RASTER_DIMENSION, Raster};
use crate::model::value::{OutputMap, Value, ValueKind};
use crate::plugin::node_types::{NodeCategory, NodeTypeDefinition};

const GRADIENT_DIRECTIONS: [&str; 2] = ["horizontal", "vertical"];

pub(super) fn generator_nodes() -> Vec<NodeTypeDefinition> {
    use ValueKind::{Color as ColorKind, Layer, Number, Option as OptionKind};
    let nc = NodeCategory::Generator;
    vec![
        node("shape.circle", "Circle", nc, circle)
            .with_description("Filled circle on a square layer of side 2 * radius")
            .with_inputs(vec![
                inp("radius", "Radius", Number),
                inp("color", "Color", ColorKind),
            ])
            .with_outputs(vec![out("layer", "Layer", Layer)])
            .with_param("radius", 50.0)
            .with_param("color", Color::WHITE),
        node("shape.rectangle", "Rectangle", nc, rectangle)
            .with_inputs(vec![
                inp("width", "Width", Number),
                inp("height", "Height", Number),
                inp("color", "Color", ColorKind),
            ])
            .with_outputs(vec![out("layer", "Layer", Layer)])
            .with_param("width", 100.0)
            .with_param("height", 100.0)
            .with_param("color", Color::WHITE),
        node("shape.gradient", "Gradient", nc, gradient)
            .with_description("Two-color linear gradient")
            .with_inputs(vec![
                inp("width", "Width", Number),
                inp("height", "Height", Number),
                inp("start", "Start", ColorKind),
                inp("end", "End", ColorKind),
                inp("direction", "Direction", OptionKind).with_options(&GRADIENT_DIRECTIONS),
            ])
            .with_outputs(vec![out("layer", "Layer", Layer)])
            .with_param("width", 100.0)
            .with_param("height", 100.0)
            .with_param("start", Color::BLACK)
            .with_param("end", Color::WHITE)
            .with_param("direction", Value::option("horizontal")),
    ]
}

/// Round a size parameter to whole pixels; negative sizes give an empty layer.
fn pixels(size: f32) -> u32 {
    size.max(0.0).ceil() as u32
}

/// Largest radius whose circle fits a maximum-sized layer.
fn circle_radius(radius: f32) -> f32 {
    radius.max(0.0).min((MAX_RASTER_DIMENSION / 2) as f32)
}

fn circle(ctx: &EvaluationContext) -> Result<OutputMap, EvalError> {
    let radius = circle_radius(ctx.get_number("radius")?);
    let color = ctx.get_color("color")?;

    let mut raster = Raster::new(pixels(radius * 2.0), pixels(radius * 2.0));
    let r2 = radius * radius;
    for y in 0..raster.height() {
        for x in 0..raster.width() {
            // Sample at pixel centers.
            let dx = x as f32 + 0.5 - radius;
            let dy = y as f32 + 0.5 - radius;
            if dx * dx + dy * dy <= r2 {
                raster.set_pixel(x as i32, y as i32, color);
            }
        }
    }
    Ok(single("layer", raster))
}

fn rectangle(ctx: &EvaluationContext) -> Result<OutputMap, EvalError> {
    let width = pixels(ctx.get_number("width")?);
    let height = pixels(ctx.get_number("height")?);
    let color = ctx.get_color("color")?;
    Ok(single("layer", Raster::filled(width, height, color)))
}

fn gradient(ctx: &EvaluationContext) -> Result<OutputMap, EvalError> {
    let width = pixels(ctx.get_number("width")?);
    let height = pixels(ctx.get_number("height")?);
    let start = ctx.get_color("start")?;
    let end = ctx.get_color("end")?;
    let vertical = ctx.get_option("direction")? == "vertical";

    let mut raster = Raster::new(width, height);
    let steps = if vertical { raster.height() } else { raster.width() };
    for y in 0..raster.height() {
        for x in 0..raster.width() {
            let i = if vertical { y } else { x };
            let t = if steps > 1 {
                i as f32 / (steps - 1) as f32
            } else {
                0.0
            };
            let color = start.lerp(end, t);
            if !color.is_transparent() {
                raster.set_pixel(x as i32, y as i32, color);
            }
        }
    }
    Ok(single("layer", raster))
}
