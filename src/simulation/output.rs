//! Simulation output and serialization

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::simulation::stats::GridStats;

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Termination {
    /// No unhappy occupants left
    Equilibrium,
    /// Unhappy occupants could not all be given distinct new addresses
    InsufficientVacancies { unhappy: usize, targets: usize },
    /// Ran the configured number of rounds
    IterationLimit,
}

/// Result of the initial-layout search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutChoice {
    pub seed: u64,
    pub happiness_factor: f64,
    pub trials: usize,
}

/// Complete run output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub seed: u64,
    pub layout: Option<LayoutChoice>,
    pub rounds: usize,
    pub termination: Termination,
    pub initial: GridStats,
    #[serde(rename = "final")]
    pub final_stats: GridStats,
    pub simulation_time_ms: u64,
}

impl SimulationOutput {
    pub fn new(
        seed: u64,
        layout: Option<LayoutChoice>,
        rounds: usize,
        termination: Termination,
        initial: GridStats,
        final_stats: GridStats,
        elapsed: Duration,
    ) -> Self {
        Self {
            seed,
            layout,
            rounds,
            termination,
            initial,
            final_stats,
            simulation_time_ms: elapsed.as_millis() as u64,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn summary(&self) -> String {
        let reason = match self.termination {
            Termination::Equilibrium => "equilibrium reached".to_string(),
            Termination::InsufficientVacancies { unhappy, targets } => format!(
                "not enough vacancies ({} unhappy, {} destinations)",
                unhappy, targets
            ),
            Termination::IterationLimit => "iteration limit".to_string(),
        };

        format!(
            "Ran {} rounds in {}ms (seed {}), stopped: {}\nHappiness {:.2} -> {:.2}",
            self.rounds,
            self.simulation_time_ms,
            self.seed,
            reason,
            self.initial.happiness_factor,
            self.final_stats.happiness_factor,
        )
    }
}
