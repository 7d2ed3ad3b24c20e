//! Same-tag neighbor counting over the Moore neighborhood

use crate::core::error::{Result, SchellingError};
use crate::core::types::{Address, Cell};
use crate::spatial::Grid;

/// Count occupants in the up-to-8 adjacent cells that share the tag of
/// the occupant at `addr`
///
/// Fails with `CellEmpty` when `addr` is vacant and `OutOfBounds` when it
/// lies outside the grid. Neighbors past the border are skipped.
pub fn count_same_tag_neighbors(grid: &Grid, addr: Address) -> Result<usize> {
    let tag = match grid.get(addr) {
        Some(Cell::Occupied(occupant)) => occupant.tag,
        Some(Cell::Empty(_)) => return Err(SchellingError::CellEmpty(addr)),
        None => {
            return Err(SchellingError::OutOfBounds {
                addr,
                size: grid.size,
            })
        }
    };

    let count = addr
        .neighbors(grid.size)
        .filter(|&n| grid.get(n).and_then(Cell::tag) == Some(tag))
        .count();

    Ok(count)
}
