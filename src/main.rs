use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use intersection_sim::report::SimulationReport;
use intersection_sim::simulation::{ControlMode, Direction, Settings, SettingsUpdate, Simulation};

#[derive(Parser)]
#[command(name = "intersection_sim")]
#[command(about = "Four-way intersection traffic simulation")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "1800")]
    ticks: u32,

    /// Time delta per tick in seconds
    #[arg(long, default_value = "0.0333333")]
    delta: f32,

    /// Signal control mode
    #[arg(long, value_enum)]
    mode: Option<ControlMode>,

    /// Seed for reproducible vehicle turn choices
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with settings overrides (camelCase field names)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write a JSON snapshot of the final state to this path
    #[arg(long)]
    export: Option<PathBuf>,

    /// Simulated seconds between periodic summaries
    #[arg(long, default_value = "5")]
    report_every: f32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    let mut sim = Simulation::with_settings(settings, cli.seed)?;

    run_headless(&mut sim, cli.ticks, cli.delta, cli.report_every);

    if let Some(path) = &cli.export {
        SimulationReport::capture(&sim).write_to(path)?;
        info!("Report written to {}", path.display());
    }
    Ok(())
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::default();

    if let Some(path) = &cli.settings {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let update = SettingsUpdate::from_json(&json)?;
        settings = match settings.merged(&update) {
            Ok(merged) => merged,
            Err(err) => {
                warn!("Rejected settings from {}: {:#}", path.display(), err);
                return Err(err.context(format!("settings file {} rejected", path.display())));
            }
        };
    }
    if let Some(mode) = cli.mode {
        settings.mode = mode;
    }
    Ok(settings)
}

/// Run the simulation without graphics
fn run_headless(sim: &mut Simulation, ticks: u32, delta: f32, report_every: f32) {
    info!(
        "Running intersection simulation: {} ticks of {:.4}s, {} mode",
        ticks,
        delta,
        sim.settings().mode
    );

    let ticks_per_report = if delta > 0.0 && report_every > 0.0 {
        ((report_every / delta).ceil() as u32).max(1)
    } else {
        ticks.max(1)
    };

    for tick in 1..=ticks {
        sim.tick(delta);
        debug_assert!(
            sim.signals().is_conflict_free(),
            "conflicting greens at tick {tick}: {}",
            sim.signals().summary()
        );

        if tick % ticks_per_report == 0 && tick < ticks {
            sim.print_summary();
        }
    }

    print_final_stats(sim);
}

fn print_final_stats(sim: &Simulation) {
    let stats = sim.stats();
    info!("=== SIMULATION COMPLETE ===");
    info!("Elapsed time: {:.2}s", sim.time());
    info!("Total cars passed: {}", stats.total_cars_passed);
    info!("Average wait: {:.2}s", stats.average_wait_time());
    info!("Active cars: {}", sim.vehicles().len());
    for direction in Direction::ALL {
        let entry = stats.direction(direction);
        info!(
            "  {}: passed={}, average wait={:.2}s",
            direction,
            entry.passed,
            entry.average_wait()
        );
    }
}
