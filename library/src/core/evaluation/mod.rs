//! Dependency-graph evaluation: context, cache, resolver and engine.

pub mod cache;
pub mod context;
pub mod engine;
pub mod error;
pub mod index;
pub mod resolver;

pub use cache::NodeCache;
pub use context::{EvaluationContext, InputMap};
pub use engine::{EvalEngine, evaluate};
pub use error::EvalError;
pub use index::GraphIndex;
pub use resolver::{VisitState, VisitTracker};
