//! Happiness evaluation
//!
//! Classifies every occupant as satisfied or not from a fixed snapshot of
//! the grid. The whole sweep finishes before any relocation is decided.

use crate::core::types::Address;
use crate::simulation::neighbors::count_same_tag_neighbors;
use crate::spatial::Grid;

/// Outcome of one evaluation sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Assessment {
    pub happy: usize,
    pub unhappy: usize,
}

impl Assessment {
    pub fn is_equilibrium(&self) -> bool {
        self.unhappy == 0
    }
}

/// Set `happy = same_tag_neighbors >= threshold` on every occupant
///
/// Neighbor counts are taken from the grid as it was before the sweep,
/// so the result does not depend on visiting order. Empty cells are
/// skipped.
pub fn assess(grid: &mut Grid, threshold: usize) -> Assessment {
    let snapshot: &Grid = grid;
    let verdicts: Vec<(Address, bool)> = snapshot
        .occupants()
        .filter_map(|occupant| {
            count_same_tag_neighbors(snapshot, occupant.addr)
                .ok()
                .map(|count| (occupant.addr, count >= threshold))
        })
        .collect();

    let mut assessment = Assessment::default();
    for (addr, happy) in verdicts {
        if let Some(occupant) = grid.get_mut(addr).and_then(|c| c.occupant_mut()) {
            occupant.happy = happy;
        }
        if happy {
            assessment.happy += 1;
        } else {
            assessment.unhappy += 1;
        }
    }

    tracing::debug!(
        "Assessment: {} happy, {} unhappy (threshold {})",
        assessment.happy,
        assessment.unhappy,
        threshold
    );

    assessment
}
