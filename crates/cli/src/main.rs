//! Command line runner for heatgrid simulations.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use heatgrid_core::{History, Simulation, render};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use uom::si::time::second;

use crate::config::ConfigFile;

/// Explicit finite-difference heat conduction on a 2D grid.
#[derive(Parser)]
#[command(name = "heatgrid")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "2D transient heat conduction simulator", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of update steps
    #[arg(short = 'n', long)]
    steps: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Print the boundary conditions of every node before running
    #[arg(long)]
    show_boundaries: bool,

    /// Print the final temperature of every node
    #[arg(long)]
    show_temperatures: bool,

    /// Print the recorded field after this many steps
    #[arg(long)]
    snapshot: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let file = match &cli.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let mut config = file.to_simulation_config();
    if let Some(steps) = cli.steps {
        config.num_steps = steps;
    }
    if let Some(step) = cli.snapshot.filter(|&step| step > config.num_steps) {
        bail!("snapshot step {step} is beyond the last step {}", config.num_steps);
    }

    let sim = Simulation::new(&config).context("failed to set up simulation")?;
    if cli.show_boundaries {
        println!("{}", render::conditions(sim.grid()));
    }

    let sim = sim.run().context("simulation failed")?;

    if let Some(step) = cli.snapshot {
        print_snapshot(sim.history(), step)?;
    }
    if cli.show_temperatures {
        println!("{}", render::temperatures(sim.grid()));
    }

    let field = sim.grid().temperatures();
    let min = field.iter().copied().fold(f64::INFINITY, f64::min);
    let max = field.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = field.mean().unwrap_or(f64::NAN);
    info!(
        time_s = sim.history().time_at(sim.grid().current_step()).get::<second>(),
        min_k = min,
        max_k = max,
        mean_k = mean,
        "final temperature field"
    );

    Ok(())
}

/// Prints the field recorded after `step` updates, one row per `j`.
fn print_snapshot(history: &History, step: usize) -> Result<()> {
    let field = history
        .snapshot(step)
        .with_context(|| format!("no snapshot recorded for step {step}"))?;

    println!("t = {} s", history.time_at(step).get::<second>());
    for row in field.columns() {
        let cells: Vec<String> = row
            .iter()
            .map(|&t| format!("{:>10}", render::format_temperature(t)))
            .collect();
        println!("{}", cells.join(" "));
    }
    Ok(())
}
