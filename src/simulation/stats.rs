//! Grid statistics

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::types::{Cell, Tag};
use crate::spatial::Grid;

/// Counts and ratios over one grid snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridStats {
    pub total: usize,
    pub empty: usize,
    pub filled: usize,
    pub happy: usize,
    pub unhappy: usize,
    pub per_tag: BTreeMap<Tag, usize>,
    /// filled / total
    pub fill_factor: f64,
    /// happy / filled, 0.0 on an unoccupied grid
    pub happiness_factor: f64,
}

impl GridStats {
    pub fn collect(grid: &Grid) -> Self {
        let mut stats = Self {
            total: grid.cell_count(),
            empty: 0,
            filled: 0,
            happy: 0,
            unhappy: 0,
            per_tag: BTreeMap::new(),
            fill_factor: 0.0,
            happiness_factor: 0.0,
        };

        for cell in grid.flatten() {
            match cell {
                Cell::Empty(_) => stats.empty += 1,
                Cell::Occupied(occupant) => {
                    stats.filled += 1;
                    if occupant.happy {
                        stats.happy += 1;
                    } else {
                        stats.unhappy += 1;
                    }
                    *stats.per_tag.entry(occupant.tag).or_default() += 1;
                }
            }
        }

        if stats.total > 0 {
            stats.fill_factor = stats.filled as f64 / stats.total as f64;
        }
        if stats.filled > 0 {
            stats.happiness_factor = stats.happy as f64 / stats.filled as f64;
        }

        stats
    }
}

impl fmt::Display for GridStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "================")?;
        writeln!(f, "Grid statistics:")?;
        writeln!(f, "Cells: {}", self.total)?;
        writeln!(f, "  Empty:  {}", self.empty)?;
        writeln!(f, "  Filled: {}", self.filled)?;
        writeln!(f, "  By tag:")?;
        for (tag, count) in &self.per_tag {
            writeln!(f, "    {}: {}", tag, count)?;
        }
        writeln!(f, "  By happiness:")?;
        writeln!(f, "    Unhappy: {}", self.unhappy)?;
        writeln!(f, "    Happy:   {}", self.happy)?;
        writeln!(f, "  Fill factor:      {:.2}", self.fill_factor)?;
        writeln!(f, "  Happiness factor: {:.2}", self.happiness_factor)?;
        write!(f, "================")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Address, Occupant};

    #[test]
    fn test_empty_grid_stats() {
        let stats = GridStats::collect(&Grid::new(4));
        assert_eq!(stats.total, 16);
        assert_eq!(stats.empty, 16);
        assert_eq!(stats.filled, 0);
        assert_eq!(stats.fill_factor, 0.0);
        assert_eq!(stats.happiness_factor, 0.0);
        assert!(stats.per_tag.is_empty());
    }

    #[test]
    fn test_counts_and_ratios() {
        let mut grid = Grid::new(2);
        grid.populate(&[
            Occupant { happy: true, ..Occupant::new(Tag::Red, Address::new(0, 0)) },
            Occupant::new(Tag::Red, Address::new(0, 1)),
            Occupant::new(Tag::Blue, Address::new(1, 1)),
        ]);
        let stats = GridStats::collect(&grid);

        assert_eq!(stats.filled, 3);
        assert_eq!(stats.empty, 1);
        assert_eq!(stats.happy, 1);
        assert_eq!(stats.unhappy, 2);
        assert_eq!(stats.per_tag[&Tag::Red], 2);
        assert_eq!(stats.per_tag[&Tag::Blue], 1);
        assert!((stats.fill_factor - 0.75).abs() < 1e-9);
        assert!((stats.happiness_factor - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_display_mentions_factors() {
        let text = GridStats::collect(&Grid::new(2)).to_string();
        assert!(text.contains("Fill factor"));
        assert!(text.contains("Happiness factor"));
    }
}
