use crate::cell::Cell;
use anyhow::Result;

/// The live cells of one run plus the offspring waiting to join them.
#[derive(Debug, Default)]
pub struct Cohort {
    cells: Vec<Cell>,
    // Offspring created during the current step; they start ageing next step.
    pending: Vec<Cell>,
}

impl Cohort {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells, pending: Vec::new() }
    }

    /// Number of live cells, pending offspring excluded.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Age of the oldest live cell, `None` for an empty cohort.
    pub fn oldest_age(&self) -> Option<u32> {
        self.cells.iter().map(Cell::age).max()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[cfg(test)]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[cfg(test)]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Takes the live cells out for processing. The caller hands survivors back
    /// with `keep`, so cells added during the step are never visited twice.
    pub fn take_for_step(&mut self) -> Vec<Cell> {
        std::mem::take(&mut self.cells)
    }

    pub fn keep(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Queues an offspring until `commit_pending`.
    pub fn add_offspring(&mut self, cell: Cell) {
        self.pending.push(cell);
    }

    /// Moves queued offspring into the live cohort and returns how many joined.
    pub fn commit_pending(&mut self) -> usize {
        let added = self.pending.len();
        self.cells.append(&mut self.pending);
        added
    }
}

/// Per-age accumulators for one run.
///
/// A single observation count serves both as the age distribution (before
/// normalisation) and as the number of potential mothers at each age.
#[derive(Debug, Clone)]
pub struct AgeStatistics {
    potential_mothers: Vec<u64>,
    mothers: Vec<u64>,
}

impl AgeStatistics {
    pub fn new(slots: usize) -> Self {
        Self {
            potential_mothers: vec![0; slots],
            mothers: vec![0; slots],
        }
    }

    pub fn slots(&self) -> usize {
        self.potential_mothers.len()
    }

    /// Counts one cell-step at `age`.
    pub fn record_observation(&mut self, age: u32) -> Result<()> {
        let slot = self.slot(age)?;
        self.potential_mothers[slot] += 1;
        Ok(())
    }

    /// Counts one division by a mother aged `age` when it divided.
    pub fn record_division(&mut self, age: u32) -> Result<()> {
        let slot = self.slot(age)?;
        self.mothers[slot] += 1;
        Ok(())
    }

    /// Fails when a cell aged `age` could not be recorded.
    pub fn ensure_age_fits(&self, age: u32) -> Result<()> {
        self.slot(age).map(|_| ())
    }

    #[cfg(test)]
    pub fn potential_mothers(&self) -> &[u64] {
        &self.potential_mothers
    }

    #[cfg(test)]
    pub fn mothers(&self) -> &[u64] {
        &self.mothers
    }

    /// Observation counts divided by the number of cells ever created.
    pub fn age_distribution(&self, total_created: u64) -> Vec<f64> {
        if total_created == 0 {
            return vec![0.0; self.slots()];
        }
        self.potential_mothers
            .iter()
            .map(|&count| count as f64 / total_created as f64)
            .collect()
    }

    /// Mothers over potential mothers per age, `None` where nothing was observed.
    pub fn division_probability(&self) -> Vec<Option<f64>> {
        self.mothers
            .iter()
            .zip(&self.potential_mothers)
            .map(|(&mothers, &potential)| {
                if potential == 0 {
                    None
                } else {
                    Some(mothers as f64 / potential as f64)
                }
            })
            .collect()
    }

    fn slot(&self, age: u32) -> Result<usize> {
        let slot = age as usize;
        if slot >= self.slots() {
            anyhow::bail!(
                "Cell age {} exceeds the per-age statistics buffer ({} slots).",
                age,
                self.slots()
            );
        }
        Ok(slot)
    }
}
