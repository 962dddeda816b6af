//! Core internal modules - not directly exposed to the editor surface.

pub mod evaluation;
