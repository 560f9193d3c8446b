//! Discrete Euler-Lotka estimate of the net reproduction number (R0).

use crate::error::EstimationError;

/// Estimates R0 from the age distribution `p` and per-age division probability `m`.
///
/// Ages where either input is undefined or non-finite are skipped. Ages whose
/// division probability is zero or negative are treated as unreliable and
/// contribute with the mean of all defined probabilities instead.
pub fn euler_lotka_estimation(p: &[f64], m: &[Option<f64>]) -> Result<f64, EstimationError> {
    let default = mean_division_probability(m).ok_or(EstimationError::InsufficientData)?;

    let estimate = p
        .iter()
        .zip(m)
        .filter_map(|(&p_i, m_i)| match m_i {
            Some(m_i) if p_i.is_finite() && m_i.is_finite() => Some((p_i, *m_i)),
            _ => None,
        })
        .map(|(p_i, m_i)| if m_i <= 0.0 { p_i * default } else { p_i * m_i })
        .sum();

    Ok(estimate)
}

/// Mean over the defined, finite entries of `m`; `None` if there are none.
pub fn mean_division_probability(m: &[Option<f64>]) -> Option<f64> {
    let defined: Vec<f64> = m.iter().flatten().copied().filter(|v| v.is_finite()).collect();
    if defined.is_empty() {
        return None;
    }
    Some(defined.iter().sum::<f64>() / defined.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_age_bucket() {
        let estimate = euler_lotka_estimation(&[1.0], &[Some(2.0)]).unwrap();
        assert_eq!(estimate, 2.0);
    }

    #[test]
    fn test_zero_probability_falls_back_to_mean() {
        // Only defined entry is 0.0, so the fallback is 0.0 too.
        let estimate = euler_lotka_estimation(&[0.5, 0.5], &[None, Some(0.0)]).unwrap();
        assert_eq!(estimate, 0.0);
    }

    #[test]
    fn test_fallback_uses_mean_of_defined_entries() {
        let p = [0.25, 0.25, 0.5];
        let m = [Some(0.0), Some(0.6), Some(0.3)];
        // default = (0.0 + 0.6 + 0.3) / 3 = 0.3
        let expected = 0.25 * 0.3 + 0.25 * 0.6 + 0.5 * 0.3;
        let estimate = euler_lotka_estimation(&p, &m).unwrap();
        assert!((estimate - expected).abs() < 1e-12);
    }

    #[test]
    fn test_undefined_and_non_finite_entries_are_skipped() {
        let p = [0.2, f64::NAN, 0.3, 0.5];
        let m = [None, Some(0.5), Some(f64::NAN), Some(0.4)];
        // Only index 3 contributes; the NaN probability is also left out of the mean.
        let estimate = euler_lotka_estimation(&p, &m).unwrap();
        assert!((estimate - 0.2).abs() < 1e-12);
        assert_eq!(mean_division_probability(&m), Some(0.45));
    }

    #[test]
    fn test_all_undefined_is_insufficient_data() {
        let result = euler_lotka_estimation(&[0.5, 0.5], &[None, None]);
        assert_eq!(result, Err(EstimationError::InsufficientData));
        assert_eq!(euler_lotka_estimation(&[], &[]), Err(EstimationError::InsufficientData));
    }
}
