use super::{inp, node, out, single};
use crate::core::evaluation::{EvalError, EvaluationContext};
use crate::model::value::{OutputMap, Value, ValueKind};
use crate::plugin::node_types::{NodeCategory, NodeTypeDefinition};

pub(super) fn logic_nodes() -> Vec<NodeTypeDefinition> {
    let nc = NodeCategory::Logic;
    vec![
        node("logic.switch", "Switch", nc, switch)
            .with_description("Pass one of two layers through")
            .with_inputs(vec![
                inp("condition", "Condition", ValueKind::Boolean),
                inp("on_true", "If True", ValueKind::Layer).required(),
                inp("on_false", "If False", ValueKind::Layer).required(),
            ])
            .with_outputs(vec![out("layer", "Layer", ValueKind::Layer)])
            .with_param("condition", true),
        node("logic.assert", "Assert", nc, assert_condition)
            .with_description("Fail the evaluation when the condition is false")
            .with_inputs(vec![
                inp("condition", "Condition", ValueKind::Boolean),
                inp("message", "Message", ValueKind::String),
            ])
            .with_outputs(vec![out("passed", "Passed", ValueKind::Boolean)])
            .with_param("condition", true)
            .with_param("message", "assertion failed"),
    ]
}

fn switch(ctx: &EvaluationContext) -> Result<OutputMap, EvalError> {
    let port = if ctx.get_boolean("condition")? {
        "on_true"
    } else {
        "on_false"
    };
    // Shares the selected layer; no pixel copy.
    let layer = ctx.get_layer(port)?;
    Ok(single("layer", Value::Layer(layer.clone())))
}

fn assert_condition(ctx: &EvaluationContext) -> Result<OutputMap, EvalError> {
    if !ctx.get_boolean("condition")? {
        return Err(ctx.fail(ctx.get_string("message")?));
    }
    Ok(single("passed", true))
}
