//! Spatial structures for the simulation

pub mod grid;

pub use grid::Grid;
