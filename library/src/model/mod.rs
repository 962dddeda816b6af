pub mod color;
pub mod graph;
pub mod raster;
pub mod value;

pub use color::{BlendMode, Color};
pub use raster::{MAX_RASTER_DIMENSION, Raster, RasterError};
pub use value::{Layer, OutputMap, ParamMap, Value, ValueKind, Vec2};

pub use graph::{Edge, Graph, NodeInstance, PortRef};
