use serde::{Deserialize, Serialize};

/// Result of one cohort run, handed to the estimators and the plot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutcome {
    /// Cell-steps observed at each age, divided by the number of cells ever created.
    pub age_distribution: Vec<f64>,
    /// Fraction of cell-steps at each age that ended in a division.
    /// `None` where no cell was ever observed at that age.
    pub division_probability: Vec<Option<f64>>,
    /// Cohort size at the start of each time step.
    pub population: Vec<usize>,
    /// Cells created over the run, initial cohort included.
    pub total_created: u64,
    /// Division events over the run.
    pub total_divisions: u64,
}

impl SimulationOutcome {
    /// Cohort size at the start of the last step, or 0 for an empty run.
    pub fn final_population(&self) -> usize {
        self.population.last().copied().unwrap_or(0)
    }

    /// (time, population) pairs with time counted from 1, as plotted.
    pub fn trajectory_points(&self) -> Vec<(u32, u32)> {
        self.population
            .iter()
            .enumerate()
            .map(|(i, &n)| (i as u32 + 1, n as u32))
            .collect()
    }
}
