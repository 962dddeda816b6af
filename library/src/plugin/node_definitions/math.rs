use super::{inp, node, out, single};
use crate::core::evaluation::{EvalError, EvaluationContext};
use crate::model::value::{OutputMap, ValueKind};
use crate::plugin::node_types::{NodeCategory, NodeTypeDefinition};

type Evaluate = fn(&EvaluationContext) -> Result<OutputMap, EvalError>;

fn binary(type_name: &str, name: &str, evaluator: Evaluate) -> NodeTypeDefinition {
    node(type_name, name, NodeCategory::Math, evaluator)
        .with_inputs(vec![
            inp("a", "A", ValueKind::Number),
            inp("b", "B", ValueKind::Number),
        ])
        .with_outputs(vec![out("result", "Result", ValueKind::Number)])
}

pub(super) fn math_nodes() -> Vec<NodeTypeDefinition> {
    vec![
        binary("math.add", "Add", add)
            .with_param("a", 0.0)
            .with_param("b", 0.0),
        binary("math.multiply", "Multiply", multiply)
            .with_param("a", 1.0)
            .with_param("b", 1.0),
        node("math.clamp", "Clamp", NodeCategory::Math, clamp)
            .with_description("Constrain a value to [min, max]")
            .with_inputs(vec![
                inp("value", "Value", ValueKind::Number),
                inp("min", "Min", ValueKind::Number),
                inp("max", "Max", ValueKind::Number),
            ])
            .with_outputs(vec![out("result", "Result", ValueKind::Number)])
            .with_param("value", 0.0)
            .with_param("min", 0.0)
            .with_param("max", 1.0),
    ]
}

fn add(ctx: &EvaluationContext) -> Result<OutputMap, EvalError> {
    Ok(single("result", ctx.get_number("a")? + ctx.get_number("b")?))
}

fn multiply(ctx: &EvaluationContext) -> Result<OutputMap, EvalError> {
    Ok(single("result", ctx.get_number("a")? * ctx.get_number("b")?))
}

fn clamp(ctx: &EvaluationContext) -> Result<OutputMap, EvalError> {
    let value = ctx.get_number("value")?;
    let min = ctx.get_number("min")?;
    let max = ctx.get_number("max")?;
    if min.is_nan() || max.is_nan() {
        return Err(ctx.fail(format!("clamp bounds must be numbers, got [{}, {}]", min, max)));
    }
    if min > max {
        return Err(ctx.fail(format!("min {} is greater than max {}", min, max)));
    }
    Ok(single("result", value.clamp(min, max)))
}
