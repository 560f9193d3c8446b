use crate::cell::{Cell, CellIdAllocator, CellVariant};
use crate::cohort::{AgeStatistics, Cohort};
use anyhow::Result;
use division_common::{DivisionParams, SimulationConfig, SimulationOutcome};
use log::{debug, info, trace};
use rand::prelude::*;

// Keeps the two variants on different random streams when a seed is configured.
const CORRELATED_SEED_OFFSET: u64 = 0x58C7;

/// What happened during one time step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    pub time_step: u32,
    /// Cohort size at the start of the step.
    pub population: usize,
    pub divisions: usize,
}

/// Manages the state and execution of one cohort run for a single cell variant.
pub struct PopulationSimulation {
    /// The simulation configuration, including initial conditions and parameters.
    config: SimulationConfig,
    params: DivisionParams,
    variant: CellVariant,
    cohort: Cohort,
    stats: AgeStatistics,
    /// Population size recorded at the start of every step.
    population: Vec<usize>,
    ids: CellIdAllocator,
    rng: StdRng,
    /// The current simulation time step number.
    current_time_step: u32,
    total_created: u64,
    total_divisions: u64,
}

impl PopulationSimulation {
    /// Creates a new run and its initial cohort. Ids come from `ids`, which may
    /// be shared with other runs.
    pub fn new(config: SimulationConfig, variant: CellVariant, ids: CellIdAllocator) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.initial_conditions.seed {
            Some(seed) => {
                let offset = match variant {
                    CellVariant::Uncorrelated => 0,
                    CellVariant::Correlated => CORRELATED_SEED_OFFSET,
                };
                StdRng::seed_from_u64(seed.wrapping_add(offset))
            }
            None => StdRng::from_os_rng(),
        };

        let params = config.get_division_params();
        let num_initial = config.initial_conditions.num_cells_initial as usize;
        let initial_cells: Vec<Cell> = (0..num_initial)
            .map(|_| Cell::new(variant, None, &params, &ids, &mut rng))
            .collect();
        debug!(
            "{} cohort seeded with {} cells: {:?}",
            variant,
            num_initial,
            initial_cells.iter().map(Cell::division_time).collect::<Vec<_>>()
        );

        let stats = AgeStatistics::new(config.statistics.max_age_slots);
        let steps = config.timing.total_steps as usize;

        Ok(Self {
            config,
            params,
            variant,
            cohort: Cohort::new(initial_cells),
            stats,
            population: Vec::with_capacity(steps),
            ids,
            rng,
            current_time_step: 0,
            total_created: num_initial as u64,
            total_divisions: 0,
        })
    }

    /// Advances the cohort by one time step.
    ///
    /// Fails without touching the cohort when the oldest cell could not be
    /// recorded in the per-age buffers.
    pub fn step(&mut self) -> Result<StepReport> {
        if let Some(oldest) = self.cohort.oldest_age() {
            self.stats.ensure_age_fits(oldest)?;
        }

        let population = self.cohort.len();
        self.population.push(population);

        let mut divisions = 0;
        // Only cells alive at the start of the step are visited.
        for mut cell in self.cohort.take_for_step() {
            self.stats.record_observation(cell.age())?;

            if cell.advance_age() {
                self.cohort.keep(cell);
                continue;
            }

            // Attributed to the age the cell had when it was observed this step.
            self.stats.record_division(cell.age() - 1)?;

            let parent_division_time = cell.division_time();
            let daughters = [(); 2].map(|_| {
                Cell::new(
                    self.variant,
                    Some(parent_division_time),
                    &self.params,
                    &self.ids,
                    &mut self.rng,
                )
            });
            trace!(
                "Dividing {} into Cell_{} and Cell_{}",
                cell,
                daughters[0].id(),
                daughters[1].id()
            );
            for daughter in daughters {
                self.cohort.add_offspring(daughter);
            }
            self.total_created += 2;
            divisions += 1;
            // The parent is dropped here; only its daughters remain.
        }

        let added = self.cohort.commit_pending();
        debug_assert_eq!(added, divisions * 2);
        self.total_divisions += divisions as u64;

        let report = StepReport {
            time_step: self.current_time_step,
            population,
            divisions,
        };
        self.current_time_step += 1;
        Ok(report)
    }

    /// Runs all configured steps, calling `on_step` after each one. An error
    /// from `on_step` stops the run.
    pub fn run<F>(mut self, mut on_step: F) -> Result<SimulationOutcome>
    where
        F: FnMut(&StepReport) -> Result<()>,
    {
        let total_steps = self.config.timing.total_steps;
        info!("Starting {} simulation for {} steps...", self.variant, total_steps);

        while self.current_time_step < total_steps {
            let report = self.step()?;
            on_step(&report)?;
        }

        let outcome = self.outcome();
        info!(
            "{} simulation finished: final population {}, {} cells created, {} divisions.",
            self.variant,
            outcome.final_population(),
            outcome.total_created,
            outcome.total_divisions
        );
        Ok(outcome)
    }

    /// Normalises the accumulated statistics into a `SimulationOutcome`.
    pub fn outcome(&self) -> SimulationOutcome {
        SimulationOutcome {
            age_distribution: self.stats.age_distribution(self.total_created),
            division_probability: self.stats.division_probability(),
            population: self.population.clone(),
            total_created: self.total_created,
            total_divisions: self.total_divisions,
        }
    }

    #[cfg(test)]
    pub fn current_time_step(&self) -> u32 {
        self.current_time_step
    }

    #[cfg(test)]
    pub fn stats(&self) -> &AgeStatistics {
        &self.stats
    }

    /// Provides access to the simulation configuration.
    #[cfg(test)]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}
