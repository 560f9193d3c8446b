use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use std::io::Write;

// Define modules used by main
mod cell;
mod cohort;
mod error;
mod euler_lotka;
mod growth;
mod simulation;

use cell::{CellIdAllocator, CellVariant};
use division_common::{SimulationConfig, SimulationOutcome};
use euler_lotka::euler_lotka_estimation;
use growth::empirical_growth_rate;
use population_plot::{MarkerStyle, PopulationPlot};
use simulation::PopulationSimulation;

const CONFIG_PATH: &str = "config.toml";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();

    // --- Load Configuration ---
    let (config, found) = SimulationConfig::load_or_default(CONFIG_PATH)?;
    if found {
        info!("Loaded configuration from {}", CONFIG_PATH);
    } else {
        warn!("No {} found; using built-in defaults.", CONFIG_PATH);
    }
    debug!("Simulation configuration: {:#?}", config);

    // Part 1: simulation of growth
    println!("{}", BOLD);
    println!("{}", ".".repeat(50));
    println!("Starting Simulation{}\n", RESET);

    // One id counter for both runs, as ids are never reused.
    let ids = CellIdAllocator::new();

    println!("Uncorrelated:");
    let uncorrelated = run_variant(&config, CellVariant::Uncorrelated, &ids)?;
    println!("\nCorrelated:");
    let correlated = run_variant(&config, CellVariant::Correlated, &ids)?;
    debug!("{} cell ids allocated across both runs.", ids.peek() - 1);

    let mut plot = PopulationPlot::new("Cell Population Growth", "Time", "Population")
        .with_size(config.output.plot_width, config.output.plot_height);
    for (variant, outcome) in [(CellVariant::Uncorrelated, &uncorrelated), (CellVariant::Correlated, &correlated)] {
        plot.add_series(variant.label(), marker_for(variant)?, outcome.trajectory_points());
    }
    plot.save(&config.output.plot_filename)
        .with_context(|| format!("Failed to save plot to {}", config.output.plot_filename))?;

    println!("\n\n{}Simulation Complete\n", BOLD);
    println!("{}", ".".repeat(50));

    // Part 2: comparison to Euler-Lotka predictions
    println!("Starting Model Checking{}\n", RESET);

    report_growth_rate(CellVariant::Uncorrelated, &uncorrelated)?;
    report_growth_rate(CellVariant::Correlated, &correlated)?;

    println!("\n{}Model Checking Complete\n", BOLD);
    println!("{}", ".".repeat(50));
    println!("{}", RESET);

    info!("Simulation Complete.");
    Ok(())
}

/// Runs one cohort, printing the overwritten `Time t: Population: n` status line.
fn run_variant(config: &SimulationConfig, variant: CellVariant, ids: &CellIdAllocator) -> Result<SimulationOutcome> {
    let show_progress = config.output.show_progress;
    let sim = PopulationSimulation::new(config.clone(), variant, ids.clone())?;

    let outcome = sim.run(|report| {
        if show_progress {
            print!("Time {}: Population: {}\r", report.time_step, report.population);
            std::io::stdout().flush().context("Failed to flush progress line")?;
        }
        Ok(())
    })?;

    debug!(
        "{} outcome: {}",
        variant,
        serde_json::to_string(&outcome).context("Failed to serialise outcome")?
    );
    Ok(outcome)
}

fn marker_for(variant: CellVariant) -> Result<MarkerStyle> {
    MarkerStyle::from_code(variant.marker_code())
        .ok_or_else(|| anyhow!("Unknown marker code {:?} for {} cells", variant.marker_code(), variant))
}

fn report_growth_rate(variant: CellVariant, outcome: &SimulationOutcome) -> Result<()> {
    let estimate = euler_lotka_estimation(&outcome.age_distribution, &outcome.division_probability)
        .with_context(|| format!("Euler-Lotka estimate failed for {} cells", variant))?;
    let actual = empirical_growth_rate(&outcome.population)
        .with_context(|| format!("Empirical growth rate failed for {} cells", variant))?;

    info!("{} growth rate: estimate {:.4}, actual {:.4}", variant, estimate, actual);
    println!("{} Growth Rate\n\tEstimate:\t{}\n\tActual:\t\t{}", variant, estimate, actual);
    Ok(())
}
