//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid coordinate (row, col), both in `0..size`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address {
    pub row: usize,
    pub col: usize,
}

impl Address {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Address of the `index`-th cell in row-major order
    #[inline]
    pub fn from_index(index: usize, size: usize) -> Self {
        Self {
            row: index / size,
            col: index % size,
        }
    }

    /// Row-major index of this address, or `None` when out of bounds
    #[inline]
    pub fn index(&self, size: usize) -> Option<usize> {
        if self.in_bounds(size) {
            Some(self.row * size + self.col)
        } else {
            None
        }
    }

    #[inline]
    pub fn in_bounds(&self, size: usize) -> bool {
        self.row < size && self.col < size
    }

    /// Moore neighborhood clipped to the grid (no wraparound)
    pub fn neighbors(&self, size: usize) -> impl Iterator<Item = Address> {
        let row = self.row as isize;
        let col = self.col as isize;
        let size = size as isize;

        (-1isize..=1).flat_map(move |dr| {
            (-1isize..=1).filter_map(move |dc| {
                if dr == 0 && dc == 0 {
                    return None;
                }
                let (r, c) = (row + dr, col + dc);
                if r < 0 || c < 0 || r >= size || c >= size {
                    None
                } else {
                    Some(Address::new(r as usize, c as usize))
                }
            })
        })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Group an occupant belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tag {
    Red,
    Blue,
    Green,
    Orange,
    Purple,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tag::Red => "Red",
            Tag::Blue => "Blue",
            Tag::Green => "Green",
            Tag::Orange => "Orange",
            Tag::Purple => "Purple",
        };
        f.write_str(name)
    }
}

/// An agent living on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub tag: Tag,
    /// Only ever written by the happiness evaluator
    pub happy: bool,
    pub addr: Address,
}

impl Occupant {
    pub fn new(tag: Tag, addr: Address) -> Self {
        Self {
            tag,
            happy: false,
            addr,
        }
    }
}

/// Contents of one grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Empty(Address),
    Occupied(Occupant),
}

impl Cell {
    #[inline]
    pub fn addr(&self) -> Address {
        match self {
            Cell::Empty(addr) => *addr,
            Cell::Occupied(occupant) => occupant.addr,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty(_))
    }

    #[inline]
    pub fn occupant(&self) -> Option<&Occupant> {
        match self {
            Cell::Occupied(occupant) => Some(occupant),
            Cell::Empty(_) => None,
        }
    }

    #[inline]
    pub fn occupant_mut(&mut self) -> Option<&mut Occupant> {
        match self {
            Cell::Occupied(occupant) => Some(occupant),
            Cell::Empty(_) => None,
        }
    }

    /// Tag of the occupant, `None` for an empty cell
    #[inline]
    pub fn tag(&self) -> Option<Tag> {
        self.occupant().map(|o| o.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip_row_major() {
        let addr = Address::new(2, 3);
        assert_eq!(addr.index(5), Some(13));
        assert_eq!(Address::from_index(13, 5), addr);
    }

    #[test]
    fn test_out_of_bounds_has_no_index() {
        assert_eq!(Address::new(5, 0).index(5), None);
        assert_eq!(Address::new(0, 5).index(5), None);
    }

    #[test]
    fn test_neighbor_counts_by_position() {
        assert_eq!(Address::new(0, 0).neighbors(5).count(), 3);
        assert_eq!(Address::new(0, 2).neighbors(5).count(), 5);
        assert_eq!(Address::new(2, 2).neighbors(5).count(), 8);
        assert_eq!(Address::new(4, 4).neighbors(5).count(), 3);
    }

    #[test]
    fn test_neighbors_exclude_self() {
        let addr = Address::new(1, 1);
        assert!(addr.neighbors(3).all(|n| n != addr));
    }

    #[test]
    fn test_single_cell_grid_has_no_neighbors() {
        assert_eq!(Address::new(0, 0).neighbors(1).count(), 0);
    }

    #[test]
    fn test_cell_addr_matches_payload() {
        let addr = Address::new(1, 4);
        assert_eq!(Cell::Empty(addr).addr(), addr);
        assert_eq!(Cell::Occupied(Occupant::new(Tag::Red, addr)).addr(), addr);
        assert!(Cell::Empty(addr).tag().is_none());
    }
}
