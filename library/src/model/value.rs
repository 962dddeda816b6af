//! Typed values exchanged between node ports.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::raster::Raster;

/// Shared handle to a raster carried by a `layer` value.
///
/// Nodes never mutate a layer they received; they clone the raster (or
/// allocate a new one) and wrap the result in a fresh handle.
pub type Layer = Arc<Raster>;

/// Node parameters keyed by parameter id.
pub type ParamMap = BTreeMap<String, Value>;

/// Values produced by one node evaluation, keyed by output port id.
pub type OutputMap = BTreeMap<String, Value>;

/// Discriminant of a [`Value`], also used to type ports.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Number,
    Color,
    Boolean,
    String,
    Vector2,
    /// A string drawn from a node-declared option set.
    Option,
    Layer,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueKind::Number => "number",
            ValueKind::Color => "color",
            ValueKind::Boolean => "boolean",
            ValueKind::String => "string",
            ValueKind::Vector2 => "vector2",
            ValueKind::Option => "option",
            ValueKind::Layer => "layer",
        };
        write!(f, "{}", s)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A tagged value. The variant is the kind; the payload type always agrees with it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Number(f32),
    Color(Color),
    Boolean(bool),
    String(String),
    Vector2(Vec2),
    Option(String),
    Layer(Layer),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Number,
            Value::Color(_) => ValueKind::Color,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::String(_) => ValueKind::String,
            Value::Vector2(_) => ValueKind::Vector2,
            Value::Option(_) => ValueKind::Option,
            Value::Layer(_) => ValueKind::Layer,
        }
    }

    pub fn option(name: impl Into<String>) -> Self {
        Value::Option(name.into())
    }

    pub fn layer(raster: Raster) -> Self {
        Value::Layer(Arc::new(raster))
    }

    pub fn as_number(&self) -> Option<f32> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Value::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_vector2(&self) -> Option<Vec2> {
        match self {
            Value::Vector2(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_option(&self) -> Option<&str> {
        match self {
            Value::Option(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_layer(&self) -> Option<&Layer> {
        match self {
            Value::Layer(raster) => Some(raster),
            _ => None,
        }
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Color> for Value {
    fn from(value: Color) -> Self {
        Value::Color(value)
    }
}

impl From<Vec2> for Value {
    fn from(value: Vec2) -> Self {
        Value::Vector2(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Raster> for Value {
    fn from(value: Raster) -> Self {
        Value::layer(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_reject_other_kinds() {
        let v = Value::Number(1.5);
        assert_eq!(v.kind(), ValueKind::Number);
        assert_eq!(v.as_number(), Some(1.5));
        assert_eq!(v.as_color(), None);
        assert_eq!(v.as_option(), None);

        // Option and string share a payload type but are distinct kinds.
        let o = Value::option("screen");
        assert_eq!(o.as_option(), Some("screen"));
        assert_eq!(o.as_string(), None);
    }

    #[test]
    fn test_value_json_layout() {
        let json = serde_json::to_value(Value::Color(Color::rgb(255, 0, 0))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "color", "value": {"r": 255, "g": 0, "b": 0, "a": 255}})
        );

        let parsed: Value =
            serde_json::from_str(r#"{"kind": "vector2", "value": {"x": 1.0, "y": -2.0}}"#).unwrap();
        assert_eq!(parsed, Value::Vector2(Vec2::new(1.0, -2.0)));
    }

    #[test]
    fn test_layer_value_survives_json() {
        let mut raster = Raster::new(4, 3);
        raster.set_pixel(1, 2, Color::rgb(10, 20, 30));
        let value = Value::layer(raster);

        let json = serde_json::to_string(&value).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, value);
    }
}
