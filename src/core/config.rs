//! Simulation configuration with documented constants
//!
//! Defaults reproduce the classic 100x100 run: 90% filled, two groups,
//! four like neighbors needed to stay put.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::core::error::{Result, SchellingError};
use crate::core::types::Tag;

/// Which trial layout the initial-layout search keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutSelection {
    /// Keep the trial with the lowest happiness factor
    #[default]
    LeastHappy,
    /// Keep the trial with the highest happiness factor
    MostHappy,
}

/// Configuration for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === GRID ===
    /// Side length N of the square grid (N x N cells)
    pub grid_size: usize,

    /// Fraction of cells that hold an occupant
    ///
    /// Split evenly across `tags`. At 0.9 on a 100x100 grid with two tags
    /// that is 4500 occupants per tag and 1000 empty cells.
    pub fill_ratio: f64,

    /// Groups present in the population
    pub tags: Vec<Tag>,

    // === BEHAVIOR ===
    /// Minimum same-tag neighbors for an occupant to be satisfied
    ///
    /// Compared against at most 8 Moore neighbors, so anything above 8
    /// makes every occupant permanently unhappy.
    pub happy_threshold: usize,

    /// Upper bound on relocation rounds
    pub iterations: usize,

    /// Number of random initial layouts tried before the main loop
    ///
    /// 0 skips the search and uses one dense random layout.
    pub layout_trials: usize,

    /// Which trial the layout search keeps
    pub layout_selection: LayoutSelection,

    /// Fixed RNG seed; drawn at random when absent
    pub seed: Option<u64>,

    // === OUTPUT ===
    /// Emit a frame every n rounds (0 disables periodic frames)
    pub render_every: usize,

    /// Size of one cell in pixels
    pub cell_size_px: u32,

    /// Draw happy/unhappy markers on periodic frames
    ///
    /// The final frame always carries markers.
    pub mark_happiness: bool,

    /// Per-tag RGB overrides for the frame palette
    pub palette: BTreeMap<Tag, [u8; 3]>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_size: 100,
            fill_ratio: 0.9,
            tags: vec![Tag::Red, Tag::Blue],

            happy_threshold: 4,
            iterations: 10_000,
            layout_trials: 10,
            layout_selection: LayoutSelection::LeastHappy,
            seed: None,

            render_every: 5,
            cell_size_px: 10,
            mark_happiness: false,
            palette: BTreeMap::new(),
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Occupants generated per tag
    pub fn per_tag_count(&self) -> usize {
        if self.tags.is_empty() {
            return 0;
        }
        let cells = (self.grid_size * self.grid_size) as f64;
        (cells * self.fill_ratio / self.tags.len() as f64) as usize
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.grid_size == 0 {
            return Err("grid_size must be at least 1".into());
        }

        if self.grid_size.checked_mul(self.grid_size).is_none() {
            return Err(format!("grid_size ({}) squared overflows", self.grid_size));
        }

        if !(self.fill_ratio > 0.0 && self.fill_ratio <= 1.0) {
            return Err(format!(
                "fill_ratio ({}) must be in (0, 1]",
                self.fill_ratio
            ));
        }

        if self.happy_threshold > 8 {
            return Err(format!(
                "happy_threshold ({}) exceeds the 8 cells of a Moore neighborhood",
                self.happy_threshold
            ));
        }

        if self.tags.is_empty() {
            return Err("at least one tag is required".into());
        }

        for (i, tag) in self.tags.iter().enumerate() {
            if self.tags[..i].contains(tag) {
                return Err(format!("tag {} listed more than once", tag));
            }
        }

        if self.cell_size_px == 0 {
            return Err("cell_size_px must be at least 1".into());
        }

        let side_px = self.grid_size as u64 * u64::from(self.cell_size_px);
        if side_px > u64::from(u32::MAX) {
            return Err(format!(
                "frame side of {} px ({} cells x {} px) exceeds u32",
                side_px, self.grid_size, self.cell_size_px
            ));
        }

        Ok(())
    }

    /// `validate` mapped into the crate error type
    pub fn ensure_valid(&self) -> Result<()> {
        self.validate().map_err(SchellingError::InvalidConfig)
    }
}
