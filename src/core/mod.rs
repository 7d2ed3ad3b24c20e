pub mod config;
pub mod error;
pub mod types;

pub use config::{LayoutSelection, SimulationConfig};
pub use error::{Result, SchellingError};
pub use types::{Address, Cell, Occupant, Tag};
