//! Graph model: node instances and the edges between their ports.

pub mod connection;
pub mod graph;
pub mod node;

pub use connection::{Edge, PortRef};
pub use graph::{ConnectOutcome, Graph};
pub use node::NodeInstance;
