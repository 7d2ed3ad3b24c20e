//! Schelling - Entry Point
//!
//! Loads a configuration, searches for an initial layout, runs the
//! relocation loop and writes frames plus a JSON summary.

use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

use schelling::core::config::{LayoutSelection, SimulationConfig};
use schelling::core::error::Result;
use schelling::render::{NoFrames, Palette, PngRenderer};
use schelling::simulation::Simulation;

/// How the run report is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Schelling segregation model on a square grid
#[derive(Parser, Debug)]
#[command(name = "schelling")]
#[command(about = "Run a Schelling segregation simulation and render its frames")]
struct Args {
    /// TOML config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid side length
    #[arg(long)]
    size: Option<usize>,

    /// Fraction of cells occupied
    #[arg(long)]
    fill: Option<f64>,

    /// Same-tag neighbors needed to be happy
    #[arg(long)]
    threshold: Option<usize>,

    /// Maximum relocation rounds
    #[arg(long)]
    iterations: Option<usize>,

    /// Initial layouts to try
    #[arg(long)]
    trials: Option<usize>,

    /// Keep the happiest trial layout instead of the least happy
    #[arg(long)]
    most_happy: bool,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Directory receiving a per-run results folder
    #[arg(long, default_value = "results")]
    output: PathBuf,

    /// Emit a frame every n rounds
    #[arg(long)]
    render_every: Option<usize>,

    /// Skip PNG output entirely
    #[arg(long)]
    no_render: bool,

    /// Draw happiness markers on every frame
    #[arg(long)]
    mark_happiness: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl Args {
    fn apply(&self, config: &mut SimulationConfig) {
        if let Some(size) = self.size {
            config.grid_size = size;
        }
        if let Some(fill) = self.fill {
            config.fill_ratio = fill;
        }
        if let Some(threshold) = self.threshold {
            config.happy_threshold = threshold;
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(trials) = self.trials {
            config.layout_trials = trials;
        }
        if self.most_happy {
            config.layout_selection = LayoutSelection::MostHappy;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(every) = self.render_every {
            config.render_every = every;
        }
        if self.mark_happiness {
            config.mark_happiness = true;
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("schelling=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    args.apply(&mut config);
    config.ensure_valid()?;

    let mut sim = Simulation::new(config)?;

    let run_dir = args.output.join(format!("run_{}_{}", unix_seconds(), sim.seed()));
    fs::create_dir_all(&run_dir)?;
    tracing::info!("Writing results to {}", run_dir.display());

    sim.search_initial_layout();

    let output = if args.no_render {
        sim.run(&mut NoFrames)?
    } else {
        let palette = Palette::from_rgb8(&sim.config().palette);
        let mut renderer =
            PngRenderer::new(&run_dir, sim.config().cell_size_px).with_palette(palette);
        sim.run(&mut renderer)?
    };

    fs::write(run_dir.join("summary.json"), output.to_json())?;

    match args.format {
        OutputFormat::Json => println!("{}", output.to_json()),
        OutputFormat::Text => {
            println!("{}", output.initial);
            println!("{}", output.final_stats);
            println!("{}", output.summary());
        }
    }

    Ok(())
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_defaults_to_text() {
        let args = Args::try_parse_from(["schelling"]).unwrap();
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn test_format_accepts_json() {
        let args = Args::try_parse_from(["schelling", "--format", "json"]).unwrap();
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Args::try_parse_from(["schelling", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "schelling",
            "--size",
            "20",
            "--threshold",
            "3",
            "--most-happy",
            "--seed",
            "7",
        ])
        .unwrap();
        let mut config = SimulationConfig::default();
        args.apply(&mut config);

        assert_eq!(config.grid_size, 20);
        assert_eq!(config.happy_threshold, 3);
        assert_eq!(config.layout_selection, LayoutSelection::MostHappy);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.iterations, 10_000);
    }
}
