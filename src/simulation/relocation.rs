//! Relocation of unhappy occupants
//!
//! Works on an assessed grid snapshot and returns the moves to apply. The
//! grid itself is not modified; the driver applies the moves to the
//! population and rebuilds the grid.

use ahash::AHashMap;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::types::Address;
use crate::spatial::Grid;

/// One occupant's change of address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: Address,
    pub to: Address,
}

/// Result of one relocation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelocationOutcome {
    /// Unhappy occupants got new addresses
    ///
    /// `stayed` lists occupants whose only remaining candidate was their
    /// own address; they keep it this round.
    Relocated { moves: Vec<Move>, stayed: Vec<Address> },
    /// Nobody is unhappy
    Equilibrium,
    /// Not enough distinct destinations for every unhappy occupant
    InsufficientVacancies { unhappy: usize, targets: usize },
}

/// Destination addresses with O(1) lookup and removal
struct TargetPool {
    addrs: Vec<Address>,
    slot_of: AHashMap<Address, usize>,
}

impl TargetPool {
    fn new(addrs: Vec<Address>) -> Self {
        let slot_of = addrs.iter().enumerate().map(|(i, &a)| (a, i)).collect();
        Self { addrs, slot_of }
    }

    fn len(&self) -> usize {
        self.addrs.len()
    }

    fn position(&self, addr: Address) -> Option<usize> {
        self.slot_of.get(&addr).copied()
    }

    fn take(&mut self, slot: usize) -> Address {
        let taken = self.addrs.swap_remove(slot);
        self.slot_of.remove(&taken);
        if let Some(&moved) = self.addrs.get(slot) {
            self.slot_of.insert(moved, slot);
        }
        taken
    }

    fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.addrs.shuffle(rng);
        for (i, addr) in self.addrs.iter().enumerate() {
            self.slot_of.insert(*addr, i);
        }
    }
}

/// Uniform slot in `pool` other than `from`'s own
///
/// `None` when `from` is the only candidate left, in which case the
/// occupant stays put. `relocate` never hits this while the grid has an
/// empty cell.
fn pick_slot<R: Rng + ?Sized>(pool: &TargetPool, from: Address, rng: &mut R) -> Option<usize> {
    let remaining = pool.len();
    match pool.position(from) {
        Some(_) if remaining == 1 => None,
        Some(own) => {
            let pick = rng.gen_range(0..remaining - 1);
            Some(if pick >= own { pick + 1 } else { pick })
        }
        None if remaining == 0 => None,
        None => Some(rng.gen_range(0..remaining)),
    }
}

/// Pick a new, distinct address for every unhappy occupant on `grid`
///
/// Candidates are the empty cells; when unhappy occupants outnumber them,
/// the occupants' own addresses join the pool. A grid with no empty cell
/// at all cannot relocate anyone.
pub fn relocate<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> RelocationOutcome {
    let empty_addrs = grid.empty_addresses();
    let unhappy: Vec<Address> = grid
        .occupants()
        .filter(|o| !o.happy)
        .map(|o| o.addr)
        .collect();

    if unhappy.is_empty() {
        return RelocationOutcome::Equilibrium;
    }

    if empty_addrs.is_empty() {
        return RelocationOutcome::InsufficientVacancies {
            unhappy: unhappy.len(),
            targets: 0,
        };
    }

    // With one empty cell or more the pool always covers every mover
    let mut candidates = empty_addrs;
    if unhappy.len() > candidates.len() {
        candidates.extend_from_slice(&unhappy);
    }

    let mut pool = TargetPool::new(candidates);
    pool.shuffle(rng);

    let mut moves = Vec::with_capacity(unhappy.len());
    let mut stayed = Vec::new();

    for from in unhappy {
        match pick_slot(&pool, from, rng) {
            Some(slot) => {
                let to = pool.take(slot);
                moves.push(Move { from, to });
            }
            None => {
                if let Some(own) = pool.position(from) {
                    pool.take(own);
                }
                stayed.push(from);
            }
        }
    }

    tracing::debug!(
        "Relocation: {} moved, {} stayed in place",
        moves.len(),
        stayed.len()
    );

    RelocationOutcome::Relocated { moves, stayed }
}
