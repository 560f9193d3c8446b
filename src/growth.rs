use crate::error::EstimationError;

/// Mean ratio of successive population sizes, ignoring steps without growth.
///
/// Ratios exactly equal to 1 are dropped before averaging.
pub fn empirical_growth_rate(population: &[usize]) -> Result<f64, EstimationError> {
    let ratios: Vec<f64> = population
        .windows(2)
        .filter(|w| w[0] > 0)
        .map(|w| w[1] as f64 / w[0] as f64)
        .filter(|&ratio| ratio != 1.0)
        .collect();

    if ratios.is_empty() {
        return Err(EstimationError::NoGrowthObserved);
    }
    Ok(ratios.iter().sum::<f64>() / ratios.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_steps_are_excluded() {
        let rate = empirical_growth_rate(&[5, 5, 7, 7, 9]).unwrap();
        let expected = (7.0 / 5.0 + 9.0 / 7.0) / 2.0;
        assert!((rate - expected).abs() < 1e-12);
        assert!((rate - 1.343).abs() < 1e-3);
    }

    #[test]
    fn test_steady_doubling() {
        let rate = empirical_growth_rate(&[5, 10, 20, 40]).unwrap();
        assert_eq!(rate, 2.0);
    }

    #[test]
    fn test_no_growth_is_an_error() {
        assert_eq!(empirical_growth_rate(&[5, 5, 5]), Err(EstimationError::NoGrowthObserved));
        assert_eq!(empirical_growth_rate(&[5]), Err(EstimationError::NoGrowthObserved));
        assert_eq!(empirical_growth_rate(&[]), Err(EstimationError::NoGrowthObserved));
    }
}
