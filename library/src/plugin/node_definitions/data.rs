use super::{node, out, single};
use crate::core::evaluation::{EvalError, EvaluationContext};
use crate::model::color::Color;
use crate::model::value::{OutputMap, Value, ValueKind, Vec2};
use crate::plugin::node_types::{NodeCategory, NodeEvaluator, NodeTypeDefinition};

/// Emits its `value` parameter unchanged on the `value` output.
struct ConstantEvaluator {
    kind: ValueKind,
}

impl NodeEvaluator for ConstantEvaluator {
    fn evaluate(&self, ctx: &EvaluationContext) -> Result<OutputMap, EvalError> {
        let value = ctx.get_value("value", self.kind)?;
        Ok(single("value", value.clone()))
    }
}

fn constant(type_name: &str, name: &str, kind: ValueKind, default: Value) -> NodeTypeDefinition {
    node(type_name, name, NodeCategory::Data, ConstantEvaluator { kind })
        .with_outputs(vec![out("value", "Value", kind)])
        .with_param("value", default)
}

pub(super) fn data_nodes() -> Vec<NodeTypeDefinition> {
    vec![
        constant("data.number", "Number", ValueKind::Number, Value::Number(0.0))
            .with_description("Single numeric value"),
        constant("data.color", "Color", ValueKind::Color, Value::Color(Color::WHITE))
            .with_description("RGBA color"),
        constant("data.boolean", "Boolean", ValueKind::Boolean, Value::Boolean(false)),
        constant("data.string", "String", ValueKind::String, Value::from(""))
            .with_description("Text string"),
        constant("data.vector2", "Vector2", ValueKind::Vector2, Value::Vector2(Vec2::ZERO))
            .with_description("2D vector"),
        constant("data.option", "Option", ValueKind::Option, Value::option(""))
            .with_description("Free-form option name, for feeding option ports"),
    ]
}
