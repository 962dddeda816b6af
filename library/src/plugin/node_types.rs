//! Node type definitions for the data-flow graph.

use std::fmt;
use std::sync::Arc;

use crate::core::evaluation::{EvalError, EvaluationContext};
use crate::model::value::{OutputMap, ParamMap, Value, ValueKind};

/// Category of a node type, used to group the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeCategory {
    /// Constant providers (number, color, string, ...)
    Data,
    /// Shape and pattern generators producing layers
    Generator,
    /// Color construction and layer tinting
    Color,
    /// Arithmetic on numbers
    Math,
    /// Layer compositing (blend, translate)
    Compositing,
    /// Control flow and assertions
    Logic,
    /// Sinks whose output is presented to the user
    Output,
    /// Plugin-defined custom category
    Custom,
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeCategory::Data => "Data",
            NodeCategory::Generator => "Generator",
            NodeCategory::Color => "Color",
            NodeCategory::Math => "Math",
            NodeCategory::Compositing => "Compositing",
            NodeCategory::Logic => "Logic",
            NodeCategory::Output => "Output",
            NodeCategory::Custom => "Custom",
        };
        write!(f, "{}", s)
    }
}

/// Direction of a port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortDirection {
    Input,
    Output,
}

/// Definition of a port on a node type.
#[derive(Clone, Debug, PartialEq)]
pub struct PortDefinition {
    /// Internal id used by edges and parameters (e.g. "radius", "layer")
    pub id: String,
    /// Display name shown in the UI
    pub display_name: String,
    pub direction: PortDirection,
    pub kind: ValueKind,
    /// Input must be supplied by an edge or a parameter.
    pub required: bool,
    /// Allowed values for `option` ports. Empty means unrestricted.
    pub options: Vec<String>,
}

impl PortDefinition {
    pub fn input(id: &str, display_name: &str, kind: ValueKind) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            direction: PortDirection::Input,
            kind,
            required: false,
            options: Vec::new(),
        }
    }

    pub fn output(id: &str, display_name: &str, kind: ValueKind) -> Self {
        Self {
            direction: PortDirection::Output,
            ..Self::input(id, display_name, kind)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }
}

/// Computes a node's outputs from its evaluation context.
pub trait NodeEvaluator: Send + Sync {
    fn evaluate(&self, ctx: &EvaluationContext) -> Result<OutputMap, EvalError>;
}

impl<F> NodeEvaluator for F
where
    F: Fn(&EvaluationContext) -> Result<OutputMap, EvalError> + Send + Sync,
{
    fn evaluate(&self, ctx: &EvaluationContext) -> Result<OutputMap, EvalError> {
        self(ctx)
    }
}

/// Definition of a node type, registered once in the `NodeRegistry`.
///
/// Node instances are `NodeInstance` structs whose `type_name` references one
/// of these. The definition is shared by every instance of the type.
#[derive(Clone)]
pub struct NodeTypeDefinition {
    /// Unique type name (e.g. "shape.circle", "compositing.blend")
    pub type_name: String,
    pub display_name: String,
    pub category: NodeCategory,
    /// Description shown in tooltips
    pub description: String,
    pub inputs: Vec<PortDefinition>,
    pub outputs: Vec<PortDefinition>,
    /// Parameters seeded into new instances of this type
    pub default_params: ParamMap,
    evaluator: Arc<dyn NodeEvaluator>,
}

impl NodeTypeDefinition {
    pub fn new(
        type_name: &str,
        display_name: &str,
        category: NodeCategory,
        evaluator: impl NodeEvaluator + 'static,
    ) -> Self {
        Self {
            type_name: type_name.to_string(),
            display_name: display_name.to_string(),
            category,
            description: String::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            default_params: ParamMap::new(),
            evaluator: Arc::new(evaluator),
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    pub fn with_inputs(mut self, inputs: Vec<PortDefinition>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_outputs(mut self, outputs: Vec<PortDefinition>) -> Self {
        self.outputs = outputs;
        self
    }

    pub fn with_param(mut self, id: &str, value: impl Into<Value>) -> Self {
        self.default_params.insert(id.to_string(), value.into());
        self
    }

    pub fn input(&self, id: &str) -> Option<&PortDefinition> {
        self.inputs.iter().find(|p| p.id == id)
    }

    pub fn output(&self, id: &str) -> Option<&PortDefinition> {
        self.outputs.iter().find(|p| p.id == id)
    }

    pub fn evaluate(&self, ctx: &EvaluationContext) -> Result<OutputMap, EvalError> {
        self.evaluator.evaluate(ctx)
    }
}

impl fmt::Debug for NodeTypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeTypeDefinition")
            .field("type_name", &self.type_name)
            .field("display_name", &self.display_name)
            .field("category", &self.category)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("default_params", &self.default_params)
            .finish_non_exhaustive()
    }
}
