use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rastergraph::{
    Color, EvalError, EvaluationContext, NodeCategory, NodeRegistry, NodeTypeDefinition,
    OutputMap, PortDefinition, Raster, Value, ValueKind,
};

pub const SCATTER_TYPE: &str = "generator.scatter";

/// Add the scatter generator to `registry`.
pub fn register(registry: &mut NodeRegistry) {
    registry.register(scatter_definition());
}

pub fn scatter_definition() -> NodeTypeDefinition {
    NodeTypeDefinition::new(SCATTER_TYPE, "Scatter", NodeCategory::Generator, scatter)
        .with_description("Seeded random single-pixel dots")
        .with_inputs(vec![
            PortDefinition::input("width", "Width", ValueKind::Number),
            PortDefinition::input("height", "Height", ValueKind::Number),
            PortDefinition::input("count", "Count", ValueKind::Number),
            PortDefinition::input("seed", "Seed", ValueKind::Number),
            PortDefinition::input("color", "Color", ValueKind::Color),
        ])
        .with_outputs(vec![PortDefinition::output("layer", "Layer", ValueKind::Layer)])
        .with_param("width", 64.0)
        .with_param("height", 64.0)
        .with_param("count", 32.0)
        .with_param("seed", 0.0)
        .with_param("color", Color::WHITE)
}

fn scatter(ctx: &EvaluationContext) -> Result<OutputMap, EvalError> {
    let width = ctx.get_number("width")?.max(0.0).ceil() as u32;
    let height = ctx.get_number("height")?.max(0.0).ceil() as u32;
    let count = ctx.get_number("count")?.max(0.0);
    let seed = ctx.get_number("seed")?.abs() as u64;
    let color = ctx.get_color("color")?;

    let mut raster = Raster::new(width, height);
    if raster.width() > 0 && raster.height() > 0 {
        // At most one dot per pixel.
        let area = raster.width() as usize * raster.height() as usize;
        let count = (count as usize).min(area);
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..count {
            let x = rng.gen_range(0..raster.width()) as i32;
            let y = rng.gen_range(0..raster.height()) as i32;
            raster.set_pixel(x, y, color);
        }
    }
    Ok(OutputMap::from([("layer".to_string(), Value::layer(raster))]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rastergraph::{NodeInstance, ParamMap, evaluate};

    fn render(registry: &NodeRegistry, seed: f32) -> Raster {
        render_with(registry, &[("seed", seed)])
    }

    fn render_with(registry: &NodeRegistry, params: &[(&str, f32)]) -> Raster {
        let params = params
            .iter()
            .map(|(k, v)| (k.to_string(), Value::Number(*v)))
            .collect::<ParamMap>();
        let node: NodeInstance = registry.create_node(SCATTER_TYPE, params).unwrap();
        let outputs = evaluate(registry, &[node.clone()], &[], node.id).unwrap();
        outputs["layer"].as_layer().unwrap().as_ref().clone()
    }

    fn registry() -> NodeRegistry {
        let mut registry = NodeRegistry::with_builtin_nodes();
        register(&mut registry);
        registry
    }

    #[test]
    fn same_seed_same_pixels() {
        let registry = registry();
        let a = render(&registry, 7.0);
        assert_eq!(a, render(&registry, 7.0));
        assert!(a.pixel_count() > 0 && a.pixel_count() <= 32);
    }

    #[test]
    fn different_seed_differs() {
        let registry = registry();
        assert_ne!(render(&registry, 1.0), render(&registry, 2.0));
    }

    #[test]
    fn registered_under_generator_category() {
        let registry = registry();
        let groups = registry.list_by_category();
        assert!(groups[&NodeCategory::Generator].iter().any(|d| d.type_name == SCATTER_TYPE));
    }

    #[test]
    fn huge_count_is_capped_by_area() {
        let registry = registry();
        let raster = render_with(&registry, &[("width", 4.0), ("height", 4.0), ("count", 1e20)]);
        assert!(raster.pixel_count() > 0 && raster.pixel_count() <= 16);
    }
}
