//! Square occupancy grid

use crate::core::types::{Address, Cell, Occupant};

/// N x N matrix of cells stored row-major
///
/// Every cell's stored address equals its position. The grid is never
/// patched cell-by-cell between rounds: `populate` rewrites all of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub size: usize,
    data: Vec<Cell>,
}

impl Grid {
    /// All-empty grid, each cell seeded with its own address
    pub fn new(size: usize) -> Self {
        let data = (0..size * size)
            .map(|i| Cell::Empty(Address::from_index(i, size)))
            .collect();
        Self { size, data }
    }

    /// Reset every cell to empty at its own address
    pub fn clear(&mut self) {
        let size = self.size;
        for (i, cell) in self.data.iter_mut().enumerate() {
            *cell = Cell::Empty(Address::from_index(i, size));
        }
    }

    /// Clear, then write every occupant into the cell at its address
    ///
    /// Callers guarantee addresses are in bounds and pairwise distinct.
    /// Out-of-bounds occupants are dropped and a repeated address keeps
    /// the last occupant written to it.
    pub fn populate<'a>(&mut self, occupants: impl IntoIterator<Item = &'a Occupant>) {
        self.clear();
        for occupant in occupants {
            self.set(occupant.addr, Cell::Occupied(*occupant));
        }
    }

    #[inline]
    pub fn get(&self, addr: Address) -> Option<&Cell> {
        addr.index(self.size).map(|i| &self.data[i])
    }

    #[inline]
    pub fn get_mut(&mut self, addr: Address) -> Option<&mut Cell> {
        addr.index(self.size).map(move |i| &mut self.data[i])
    }

    #[inline]
    fn set(&mut self, addr: Address, value: Cell) {
        if let Some(i) = addr.index(self.size) {
            self.data[i] = value;
        }
    }

    /// All N² cells in row-major order
    pub fn flatten(&self) -> &[Cell] {
        &self.data
    }

    pub fn occupants(&self) -> impl Iterator<Item = &Occupant> {
        self.data.iter().filter_map(Cell::occupant)
    }

    pub fn empty_addresses(&self) -> Vec<Address> {
        self.data
            .iter()
            .filter(|c| c.is_empty())
            .map(Cell::addr)
            .collect()
    }

    pub fn cell_count(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Tag;

    #[test]
    fn test_new_grid_is_empty_and_self_addressed() {
        let grid = Grid::new(4);
        assert_eq!(grid.flatten().len(), 16);
        for (i, cell) in grid.flatten().iter().enumerate() {
            assert!(cell.is_empty());
            assert_eq!(cell.addr(), Address::from_index(i, 4));
        }
    }

    #[test]
    fn test_populate_places_occupants() {
        let mut grid = Grid::new(3);
        let occupants = vec![
            Occupant::new(Tag::Red, Address::new(0, 1)),
            Occupant::new(Tag::Blue, Address::new(2, 2)),
        ];
        grid.populate(&occupants);

        assert_eq!(grid.occupants().count(), 2);
        assert_eq!(grid.get(Address::new(0, 1)).and_then(Cell::tag), Some(Tag::Red));
        assert_eq!(grid.get(Address::new(2, 2)).and_then(Cell::tag), Some(Tag::Blue));
        assert_eq!(grid.empty_addresses().len(), 7);
    }

    #[test]
    fn test_populate_discards_previous_content() {
        let mut grid = Grid::new(3);
        grid.populate(&[Occupant::new(Tag::Red, Address::new(1, 1))]);
        grid.populate(&[Occupant::new(Tag::Blue, Address::new(0, 0))]);

        assert!(grid.get(Address::new(1, 1)).unwrap().is_empty());
        assert_eq!(grid.occupants().count(), 1);
    }

    #[test]
    fn test_populate_drops_out_of_bounds() {
        let mut grid = Grid::new(2);
        grid.populate(&[Occupant::new(Tag::Red, Address::new(5, 5))]);
        assert_eq!(grid.occupants().count(), 0);
    }

    #[test]
    fn test_populate_duplicate_address_keeps_last() {
        let mut grid = Grid::new(2);
        let addr = Address::new(1, 0);
        grid.populate(&[Occupant::new(Tag::Red, addr), Occupant::new(Tag::Blue, addr)]);
        assert_eq!(grid.occupants().count(), 1);
        assert_eq!(grid.get(addr).and_then(Cell::tag), Some(Tag::Blue));
    }

    #[test]
    fn test_clear_restores_empty_cells() {
        let mut grid = Grid::new(2);
        grid.populate(&[Occupant::new(Tag::Red, Address::new(0, 0))]);
        grid.clear();
        assert_eq!(grid, Grid::new(2));
    }

    #[test]
    fn test_get_out_of_bounds() {
        let grid = Grid::new(2);
        assert!(grid.get(Address::new(2, 0)).is_none());
    }
}
