//! Main simulation loop
//!
//! Each round: rebuild the grid from the population, assess every
//! occupant, relocate the unhappy ones, apply the moves.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

use crate::core::config::{LayoutSelection, SimulationConfig};
use crate::core::error::{Result, SchellingError};
use crate::render::FrameSink;
use crate::simulation::happiness::assess;
use crate::simulation::output::{LayoutChoice, SimulationOutput, Termination};
use crate::simulation::population::Population;
use crate::simulation::relocation::{relocate, RelocationOutcome};
use crate::simulation::stats::GridStats;
use crate::spatial::Grid;

/// What a single round produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Occupants moved; the run can continue
    Continue { moved: usize, stayed: usize },
    /// The run is over
    Finished(Termination),
}

/// Owns the grid, the population and the run's random source
pub struct Simulation {
    config: SimulationConfig,
    grid: Grid,
    population: Population,
    rng: ChaCha8Rng,
    seed: u64,
    round: usize,
    layout: Option<LayoutChoice>,
}

impl Simulation {
    /// Generate the population from `config` and give it a dense random layout
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.ensure_valid()?;
        let mut population = Population::from_config(&config)?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        population.register_dense(&mut rng);

        tracing::info!(
            "Created {}x{} grid with {} occupants (seed {})",
            config.grid_size,
            config.grid_size,
            population.len(),
            seed
        );

        Ok(Self::assemble(config, population, rng, seed))
    }

    /// Start from an already-addressed population
    pub fn with_population(config: SimulationConfig, population: Population) -> Result<Self> {
        config.ensure_valid()?;
        if population.size() != config.grid_size {
            return Err(SchellingError::InvalidConfig(format!(
                "population laid out for size {}, config says {}",
                population.size(),
                config.grid_size
            )));
        }
        population.verify()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let rng = ChaCha8Rng::seed_from_u64(seed);
        Ok(Self::assemble(config, population, rng, seed))
    }

    fn assemble(
        config: SimulationConfig,
        population: Population,
        rng: ChaCha8Rng,
        seed: u64,
    ) -> Self {
        let mut grid = Grid::new(config.grid_size);
        grid.populate(population.occupants());
        Self {
            config,
            grid,
            population,
            rng,
            seed,
            round: 0,
            layout: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Rounds completed with at least one relocation pass
    pub fn round(&self) -> usize {
        self.round
    }

    /// Try `layout_trials` dense layouts and keep the one picked by
    /// `layout_selection`
    ///
    /// Each trial is scored by its happiness factor after assessment. The
    /// winner is replayed from its seed, so the result is reproducible.
    pub fn search_initial_layout(&mut self) -> Option<LayoutChoice> {
        let trials = self.config.layout_trials;
        if trials == 0 {
            return None;
        }

        let mut best: Option<(u64, f64)> = None;
        for trial in 0..trials {
            let trial_seed: u64 = self.rng.gen();
            let factor = self.score_layout(trial_seed);
            tracing::debug!(
                "Layout trial {}: happiness factor {:.4} (seed {})",
                trial,
                factor,
                trial_seed
            );

            let better = match (best, self.config.layout_selection) {
                (None, _) => true,
                (Some((_, b)), LayoutSelection::LeastHappy) => factor < b,
                (Some((_, b)), LayoutSelection::MostHappy) => factor > b,
            };
            if better {
                best = Some((trial_seed, factor));
            }
        }

        let (seed, happiness_factor) = best?;
        self.population
            .register_dense(&mut ChaCha8Rng::seed_from_u64(seed));
        self.grid.populate(self.population.occupants());

        let choice = LayoutChoice {
            seed,
            happiness_factor,
            trials,
        };
        tracing::info!(
            "Picked layout seed {} with happiness factor {:.4} ({:?} of {} trials)",
            seed,
            happiness_factor,
            self.config.layout_selection,
            trials
        );
        self.layout = Some(choice);
        Some(choice)
    }

    fn score_layout(&mut self, seed: u64) -> f64 {
        self.population
            .register_dense(&mut ChaCha8Rng::seed_from_u64(seed));
        self.grid.populate(self.population.occupants());
        assess(&mut self.grid, self.config.happy_threshold);
        GridStats::collect(&self.grid).happiness_factor
    }

    /// Run one round
    ///
    /// Equilibrium and insufficient vacancies come back as
    /// `RoundOutcome::Finished`; only a broken invariant is an error.
    pub fn step(&mut self) -> Result<RoundOutcome> {
        self.grid.populate(self.population.occupants());
        assess(&mut self.grid, self.config.happy_threshold);
        self.population.sync_happiness(&self.grid)?;

        match relocate(&self.grid, &mut self.rng) {
            RelocationOutcome::Equilibrium => Ok(RoundOutcome::Finished(Termination::Equilibrium)),
            RelocationOutcome::InsufficientVacancies { unhappy, targets } => Ok(
                RoundOutcome::Finished(Termination::InsufficientVacancies { unhappy, targets }),
            ),
            RelocationOutcome::Relocated { moves, stayed } => {
                self.population.apply_moves(&moves)?;
                self.grid.populate(self.population.occupants());
                self.check_invariants()?;
                self.round += 1;
                Ok(RoundOutcome::Continue {
                    moved: moves.len(),
                    stayed: stayed.len(),
                })
            }
        }
    }

    /// Population size and grid occupancy must agree after every round
    pub fn check_invariants(&self) -> Result<()> {
        self.population.verify()?;
        let on_grid = self.grid.occupants().count();
        if on_grid != self.population.len() {
            return Err(SchellingError::InvariantViolation(format!(
                "{} occupants on the grid, population has {}",
                on_grid,
                self.population.len()
            )));
        }
        Ok(())
    }

    /// Assess the current layout without relocating anyone
    pub fn assess_current(&mut self) -> Result<GridStats> {
        self.grid.populate(self.population.occupants());
        assess(&mut self.grid, self.config.happy_threshold);
        self.population.sync_happiness(&self.grid)?;
        Ok(GridStats::collect(&self.grid))
    }

    /// Run up to `iterations` rounds, handing frames to `sink`
    ///
    /// Frame failures are logged and do not stop the run. A final frame
    /// with happiness markers is emitted however the run ends.
    pub fn run<S: FrameSink + ?Sized>(&mut self, sink: &mut S) -> Result<SimulationOutput> {
        let start = Instant::now();
        let initial = self.assess_current()?;
        self.emit_frame(sink, "initial", self.config.mark_happiness);

        let mut termination = Termination::IterationLimit;
        for _ in 0..self.config.iterations {
            match self.step()? {
                RoundOutcome::Continue { moved, stayed } => {
                    tracing::debug!("Round {}: {} moved, {} stayed", self.round, moved, stayed);
                    let every = self.config.render_every;
                    if every > 0 && self.round % every == 0 {
                        let label = format!("{:06}", self.round);
                        self.emit_frame(sink, &label, self.config.mark_happiness);
                    }
                }
                RoundOutcome::Finished(reason) => {
                    termination = reason;
                    break;
                }
            }
        }

        let final_stats = self.assess_current()?;
        self.emit_frame(sink, "final", true);

        tracing::info!(
            "Stopped after {} rounds: {:?}, happiness factor {:.4}",
            self.round,
            termination,
            final_stats.happiness_factor
        );

        Ok(SimulationOutput::new(
            self.seed,
            self.layout,
            self.round,
            termination,
            initial,
            final_stats,
            start.elapsed(),
        ))
    }

    fn emit_frame<S: FrameSink + ?Sized>(&self, sink: &mut S, label: &str, mark_happiness: bool) {
        if let Err(e) = sink.emit(&self.grid, label, mark_happiness) {
            tracing::warn!("Render error for frame {}: {}", label, e);
        }
    }
}
