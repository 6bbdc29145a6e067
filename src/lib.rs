//! Bond percolation on a 2-D square lattice.
//!
//! The crate is split into layers:
//! - domain: grid topology, edge masks, component partitions and the ports
//! - usecase: sampling, walks, the query surface and the simulation pipeline
//! - infrastructure: union-find, BFS, the cache store and event printing
//! - interface: CLI wiring

pub mod domain;
pub mod infrastructure;
pub mod interface;
pub mod usecase;
