//! Frame output for grid snapshots
//!
//! Provides visual representation of simulation state.
//! This module is READ-ONLY - it never modifies simulation state.

pub mod colors;
pub mod frame;

pub use colors::{tag_color, Color, Palette};
pub use frame::{render_image, PngRenderer};

use crate::core::error::Result;
use crate::spatial::Grid;

/// Receives grid snapshots from the driver
///
/// Errors are reported back to the driver, which logs them and keeps
/// simulating.
pub trait FrameSink {
    fn emit(&mut self, grid: &Grid, label: &str, mark_happiness: bool) -> Result<()>;
}

/// Discards every frame
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFrames;

impl FrameSink for NoFrames {
    fn emit(&mut self, _grid: &Grid, _label: &str, _mark_happiness: bool) -> Result<()> {
        Ok(())
    }
}
