//! Population generation and address registration
//!
//! The population is the fixed list of occupants that outlives every grid
//! rebuild. After generation nobody is added or removed; rounds only
//! rewrite addresses and happiness flags.

use ahash::{AHashMap, AHashSet};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SchellingError};
use crate::core::types::{Address, Cell, Occupant, Tag};
use crate::simulation::relocation::Move;
use crate::spatial::Grid;

#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    size: usize,
    occupants: Vec<Occupant>,
}

impl Population {
    /// `per_tag` occupants of each tag, unregistered and unhappy
    pub fn generate(size: usize, per_tag: usize, tags: &[Tag]) -> Result<Self> {
        let total = per_tag * tags.len();
        if total > size * size {
            return Err(SchellingError::InvalidConfig(format!(
                "{} occupants do not fit on a {}x{} grid",
                total, size, size
            )));
        }

        let occupants = tags
            .iter()
            .flat_map(|&tag| std::iter::repeat(tag).take(per_tag))
            .map(|tag| Occupant::new(tag, Address::default()))
            .collect();

        Ok(Self { size, occupants })
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        Self::generate(config.grid_size, config.per_tag_count(), &config.tags)
    }

    /// Wrap an already-addressed list, rejecting duplicate or
    /// out-of-bounds addresses
    pub fn from_occupants(size: usize, occupants: Vec<Occupant>) -> Result<Self> {
        let population = Self { size, occupants };
        population.verify()?;
        Ok(population)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    pub fn occupants(&self) -> &[Occupant] {
        &self.occupants
    }

    /// Give every occupant a distinct random address
    ///
    /// All N² addresses are shuffled once and handed out in order.
    pub fn register_random<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut addresses: Vec<Address> = (0..self.size * self.size)
            .map(|i| Address::from_index(i, self.size))
            .collect();
        addresses.shuffle(rng);

        for (occupant, addr) in self.occupants.iter_mut().zip(addresses) {
            occupant.addr = addr;
            occupant.happy = false;
        }
    }

    /// Shuffle occupants together with N² - len empty slots and lay the
    /// result out row-major
    pub fn register_dense<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let cells = self.size * self.size;
        let mut slots: Vec<Option<usize>> = (0..self.occupants.len())
            .map(Some)
            .chain(std::iter::repeat(None))
            .take(cells)
            .collect();
        slots.shuffle(rng);

        for (i, slot) in slots.into_iter().enumerate() {
            if let Some(k) = slot {
                self.occupants[k].addr = Address::from_index(i, self.size);
                self.occupants[k].happy = false;
            }
        }
    }

    /// Copy happiness flags from an assessed grid
    pub fn sync_happiness(&mut self, grid: &Grid) -> Result<()> {
        for occupant in &mut self.occupants {
            match grid.get(occupant.addr) {
                Some(Cell::Occupied(cell)) if cell.tag == occupant.tag => {
                    occupant.happy = cell.happy;
                }
                other => {
                    return Err(SchellingError::InvariantViolation(format!(
                        "{} occupant at {} not found on the grid (found {:?})",
                        occupant.tag, occupant.addr, other
                    )));
                }
            }
        }
        Ok(())
    }

    /// Apply a batch of moves computed against the current addresses
    ///
    /// Sources are resolved before any address changes, so a move into a
    /// slot vacated by another move in the same batch is fine.
    pub fn apply_moves(&mut self, moves: &[Move]) -> Result<()> {
        let by_addr: AHashMap<Address, usize> = self
            .occupants
            .iter()
            .enumerate()
            .map(|(i, o)| (o.addr, i))
            .collect();

        let mut targets = Vec::with_capacity(moves.len());
        for mv in moves {
            let idx = by_addr.get(&mv.from).copied().ok_or_else(|| {
                SchellingError::InvariantViolation(format!(
                    "no occupant at move source {}",
                    mv.from
                ))
            })?;
            targets.push((idx, mv.to));
        }

        for (idx, to) in targets {
            self.occupants[idx].addr = to;
        }
        Ok(())
    }

    /// Check that every address is in bounds and used once
    pub fn verify(&self) -> Result<()> {
        let mut seen = AHashSet::with_capacity(self.occupants.len());
        for occupant in &self.occupants {
            if !occupant.addr.in_bounds(self.size) {
                return Err(SchellingError::InvariantViolation(format!(
                    "occupant address {} outside {}x{} grid",
                    occupant.addr, self.size, self.size
                )));
            }
            if !seen.insert(occupant.addr) {
                return Err(SchellingError::InvariantViolation(format!(
                    "address {} assigned twice",
                    occupant.addr
                )));
            }
        }
        Ok(())
    }

    pub fn count_by_tag(&self, tag: Tag) -> usize {
        self.occupants.iter().filter(|o| o.tag == tag).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generate_counts_per_tag() {
        let population = Population::generate(10, 45, &[Tag::Red, Tag::Blue]).unwrap();
        assert_eq!(population.len(), 90);
        assert_eq!(population.count_by_tag(Tag::Red), 45);
        assert_eq!(population.count_by_tag(Tag::Blue), 45);
        assert!(population.occupants().iter().all(|o| !o.happy));
    }

    #[test]
    fn test_generate_rejects_overfull() {
        assert!(Population::generate(3, 5, &[Tag::Red, Tag::Blue]).is_err());
    }

    #[test]
    fn test_from_config_uses_fill_ratio() {
        let config = SimulationConfig {
            grid_size: 10,
            fill_ratio: 0.5,
            tags: vec![Tag::Red, Tag::Blue, Tag::Green],
            ..Default::default()
        };
        let population = Population::from_config(&config).unwrap();
        assert_eq!(population.len(), 48);
    }

    #[test]
    fn test_register_random_gives_distinct_addresses() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut population = Population::generate(6, 15, &[Tag::Red, Tag::Blue]).unwrap();
        population.register_random(&mut rng);
        assert!(population.verify().is_ok());
    }

    #[test]
    fn test_register_dense_on_full_grid_covers_every_cell() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut population = Population::generate(4, 8, &[Tag::Red, Tag::Blue]).unwrap();
        population.register_dense(&mut rng);
        assert!(population.verify().is_ok());

        let mut grid = Grid::new(4);
        grid.populate(population.occupants());
        assert!(grid.empty_addresses().is_empty());
    }

    #[test]
    fn test_register_dense_is_seed_deterministic() {
        let mut a = Population::generate(8, 20, &[Tag::Red, Tag::Blue]).unwrap();
        let mut b = a.clone();
        a.register_dense(&mut ChaCha8Rng::seed_from_u64(3));
        b.register_dense(&mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_occupants_rejects_duplicates() {
        let addr = Address::new(0, 0);
        let err = Population::from_occupants(
            3,
            vec![Occupant::new(Tag::Red, addr), Occupant::new(Tag::Blue, addr)],
        )
        .unwrap_err();
        assert!(matches!(err, SchellingError::InvariantViolation(_)));
    }

    #[test]
    fn test_apply_moves_handles_chains() {
        let mut population = Population::from_occupants(
            3,
            vec![
                Occupant::new(Tag::Red, Address::new(0, 0)),
                Occupant::new(Tag::Blue, Address::new(0, 1)),
            ],
        )
        .unwrap();

        // Red takes Blue's old slot while Blue leaves for an empty one
        population
            .apply_moves(&[
                Move { from: Address::new(0, 0), to: Address::new(0, 1) },
                Move { from: Address::new(0, 1), to: Address::new(2, 2) },
            ])
            .unwrap();

        assert_eq!(population.occupants()[0].addr, Address::new(0, 1));
        assert_eq!(population.occupants()[1].addr, Address::new(2, 2));
        assert!(population.verify().is_ok());
    }

    #[test]
    fn test_apply_moves_unknown_source_is_invariant_violation() {
        let occupants = vec![Occupant::new(Tag::Red, Address::new(0, 0))];
        let mut population = Population::from_occupants(3, occupants).unwrap();
        let err = population
            .apply_moves(&[Move {
                from: Address::new(1, 1),
                to: Address::new(2, 2),
            }])
            .unwrap_err();
        assert!(matches!(err, SchellingError::InvariantViolation(_)));
    }

    #[test]
    fn test_sync_happiness_copies_flags() {
        let occupants = vec![Occupant::new(Tag::Red, Address::new(1, 1))];
        let mut population = Population::from_occupants(2, occupants).unwrap();
        let mut grid = Grid::new(2);
        grid.populate(population.occupants());
        if let Some(o) = grid.get_mut(Address::new(1, 1)).and_then(|c| c.occupant_mut()) {
            o.happy = true;
        }
        population.sync_happiness(&grid).unwrap();
        assert!(population.occupants()[0].happy);
    }

    #[test]
    fn test_sync_happiness_detects_desync() {
        let occupants = vec![Occupant::new(Tag::Red, Address::new(1, 1))];
        let mut population = Population::from_occupants(2, occupants).unwrap();
        let grid = Grid::new(2);
        assert!(population.sync_happiness(&grid).is_err());
    }
}
