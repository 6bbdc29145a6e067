//! Usecase layer: simulation workflows + events.

pub mod config;
pub mod event;
pub mod simulate;
pub mod stats;
pub mod validate;
