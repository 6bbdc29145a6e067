//! Domain layer: pure, synchronous lattice rules.

pub mod error;
pub mod graph;
pub mod model;
pub mod traits;
