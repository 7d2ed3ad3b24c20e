//! Schelling - residential segregation simulation on a square grid

pub mod core;
pub mod render;
pub mod simulation;
pub mod spatial;
