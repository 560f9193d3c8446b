use division_common::DivisionParams;
use rand::Rng;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub type CellId = u64;

/// Division-time model a cell was created under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellVariant {
    /// Division time drawn from a fixed range, independent of the parent.
    Uncorrelated,
    /// Division time drawn around the parent's division time.
    Correlated,
}

impl CellVariant {
    pub fn label(self) -> &'static str {
        match self {
            CellVariant::Uncorrelated => "Uncorrelated",
            CellVariant::Correlated => "Correlated",
        }
    }

    /// Plot marker code for this variant's trajectory.
    pub fn marker_code(self) -> &'static str {
        match self {
            CellVariant::Uncorrelated => "+",
            CellVariant::Correlated => "x",
        }
    }
}

impl fmt::Display for CellVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hands out cell ids. Clones share one counter, so ids stay unique across runs.
#[derive(Debug, Clone)]
pub struct CellIdAllocator {
    next: Arc<AtomicU64>,
}

impl CellIdAllocator {
    pub fn new() -> Self {
        Self { next: Arc::new(AtomicU64::new(1)) }
    }

    pub fn next_id(&self) -> CellId {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Id the next allocated cell will receive.
    pub fn peek(&self) -> CellId {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for CellIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct Cell {
    id: CellId,
    age: u32,
    division_time: i32,
    variant: CellVariant,
}

impl Cell {
    /// Creates a cell of age 0 with a freshly drawn division time.
    ///
    /// `parent_division_time` only matters for correlated cells; `None` means
    /// first generation and falls back to the configured default.
    pub fn new<R: Rng>(
        variant: CellVariant,
        parent_division_time: Option<i32>,
        params: &DivisionParams,
        ids: &CellIdAllocator,
        rng: &mut R,
    ) -> Self {
        let range = match variant {
            CellVariant::Uncorrelated => params.uncorrelated_range(),
            CellVariant::Correlated => params.correlated_range(parent_division_time),
        };
        Self {
            id: ids.next_id(),
            age: 0,
            division_time: rng.random_range(range),
            variant,
        }
    }

    /// Ages the cell by one step.
    ///
    /// Returns `false` when this step is the division event. A non-positive
    /// division time never triggers division.
    pub fn advance_age(&mut self) -> bool {
        self.age += 1;
        self.age as i64 <= self.division_time as i64 || self.division_time <= 0
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn division_time(&self) -> i32 {
        self.division_time
    }

    #[cfg(test)]
    pub fn variant(&self) -> CellVariant {
        self.variant
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cell_{}:\t{}\tAge={}\tDivision_Time={}",
            self.id, self.variant, self.age, self.division_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_uncorrelated_division_time_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let params = DivisionParams::default();
        let ids = CellIdAllocator::new();
        for _ in 0..1000 {
            let cell = Cell::new(CellVariant::Uncorrelated, None, &params, &ids, &mut rng);
            assert!((2..=8).contains(&cell.division_time()));
            assert_eq!(cell.age(), 0);
        }
    }

    #[test]
    fn test_uncorrelated_ignores_parent() {
        let mut rng = StdRng::seed_from_u64(42);
        let params = DivisionParams::default();
        let ids = CellIdAllocator::new();
        for _ in 0..200 {
            let cell = Cell::new(CellVariant::Uncorrelated, Some(40), &params, &ids, &mut rng);
            assert!((2..=8).contains(&cell.division_time()));
        }
    }

    #[test]
    fn test_correlated_division_time_follows_parent() {
        let mut rng = StdRng::seed_from_u64(7);
        let params = DivisionParams::default();
        let ids = CellIdAllocator::new();
        for parent in [-4, 0, 2, 5, 11] {
            for _ in 0..200 {
                let cell = Cell::new(CellVariant::Correlated, Some(parent), &params, &ids, &mut rng);
                assert!((parent - 3..=parent + 3).contains(&cell.division_time()));
            }
        }
        for _ in 0..200 {
            let cell = Cell::new(CellVariant::Correlated, None, &params, &ids, &mut rng);
            assert!((2..=8).contains(&cell.division_time()));
        }
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let mut rng = StdRng::seed_from_u64(1);
        let params = DivisionParams::default();
        let ids = CellIdAllocator::new();
        let shared = ids.clone();
        let a = Cell::new(CellVariant::Uncorrelated, None, &params, &ids, &mut rng);
        let b = Cell::new(CellVariant::Correlated, None, &params, &shared, &mut rng);
        let c = Cell::new(CellVariant::Uncorrelated, None, &params, &ids, &mut rng);
        assert_eq!(a.id(), 1);
        assert_eq!(b.id(), 2);
        assert_eq!(c.id(), 3);
        assert_eq!(ids.peek(), 4);
    }

    #[test]
    fn test_advance_age_signals_division_after_division_time() {
        let mut rng = StdRng::seed_from_u64(3);
        let params = DivisionParams::default();
        let ids = CellIdAllocator::new();
        let mut cell = Cell::new(CellVariant::Uncorrelated, None, &params, &ids, &mut rng);
        let division_time = cell.division_time();

        for expected_age in 1..=division_time as u32 {
            assert!(cell.advance_age());
            assert_eq!(cell.age(), expected_age);
        }
        assert!(!cell.advance_age());
        assert_eq!(cell.age(), division_time as u32 + 1);
        // Division time never changes while ageing.
        assert_eq!(cell.division_time(), division_time);
    }

    #[test]
    fn test_non_positive_division_time_never_divides() {
        let mut cell = Cell {
            id: 1,
            age: 0,
            division_time: 0,
            variant: CellVariant::Correlated,
        };
        for step in 1..=50 {
            assert!(cell.advance_age());
            assert_eq!(cell.age(), step);
        }
        cell.division_time = -2;
        assert!(cell.advance_age());
    }

    #[test]
    fn test_display_format() {
        let cell = Cell {
            id: 12,
            age: 3,
            division_time: 6,
            variant: CellVariant::Correlated,
        };
        assert_eq!(cell.to_string(), "Cell_12:\tCorrelated\tAge=3\tDivision_Time=6");
    }

    #[test]
    fn test_variant_marker_codes_parse() {
        use population_plot::MarkerStyle;
        assert_eq!(MarkerStyle::from_code(CellVariant::Uncorrelated.marker_code()), Some(MarkerStyle::Plus));
        assert_eq!(MarkerStyle::from_code(CellVariant::Correlated.marker_code()), Some(MarkerStyle::Cross));
    }
}
