//! Schelling segregation simulation
//!
//! Data flows one way per round: grid snapshot, neighbor counts,
//! happiness flags, relocation moves, rebuilt grid.

pub mod driver;
pub mod happiness;
pub mod neighbors;
pub mod output;
pub mod population;
pub mod relocation;
pub mod stats;

pub use driver::{RoundOutcome, Simulation};
pub use happiness::{assess, Assessment};
pub use neighbors::count_same_tag_neighbors;
pub use output::{LayoutChoice, SimulationOutput, Termination};
pub use population::Population;
pub use relocation::{relocate, Move, RelocationOutcome};
pub use stats::GridStats;
