use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Division-time rules derived from the configuration, used whenever a cell is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivisionParams {
    pub uncorrelated_min: i32,
    pub uncorrelated_max: i32,
    pub correlated_spread: i32,
    pub default_parent_division_time: i32,
}

impl DivisionParams {
    /// Range an uncorrelated cell draws its division time from.
    pub fn uncorrelated_range(&self) -> RangeInclusive<i32> {
        self.uncorrelated_min..=self.uncorrelated_max
    }

    /// Range a correlated cell draws from, centred on its parent's division time.
    /// First-generation cells use `default_parent_division_time`.
    pub fn correlated_range(&self, parent_division_time: Option<i32>) -> RangeInclusive<i32> {
        let parent = parent_division_time.unwrap_or(self.default_parent_division_time);
        (parent - self.correlated_spread)..=(parent + self.correlated_spread)
    }
}

impl Default for DivisionParams {
    fn default() -> Self {
        crate::config::SimulationConfig::default().get_division_params()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ranges() {
        let params = DivisionParams::default();
        assert_eq!(params.uncorrelated_range(), 2..=8);
        assert_eq!(params.correlated_range(None), 2..=8);
        assert_eq!(params.correlated_range(Some(2)), -1..=5);
    }
}
