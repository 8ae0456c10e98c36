//! Inequality measures for non-negative distributions.

/// Gini coefficient of `values`, in `[0, 1)`.
///
/// Values are sorted ascending internally and weighted by their 1-based rank:
///
/// ```text
/// G = Σ (2·i − n − 1) · v_i / (n · Σ v)
/// ```
///
/// The result does not depend on input order. A perfectly equal distribution
/// gives `0.0`; a distribution where one value holds the entire total gives
/// `(n - 1) / n`. Empty and all-zero inputs return `0.0`.
///
/// # Examples
///
/// ```
/// # use moltstat_stats::inequality::gini_coefficient;
/// assert_eq!(gini_coefficient(&[5.0, 5.0, 5.0, 5.0]), 0.0);
/// assert_eq!(gini_coefficient(&[0.0, 10.0]), 0.5);
/// assert_eq!(gini_coefficient(&[]), 0.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn gini_coefficient(values: &[f64]) -> f64 {
    if values.iter().all(|&v| v == 0.0) {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let total = sorted.iter().sum::<f64>();
    if total == 0.0 {
        return 0.0;
    }

    let n = sorted.len() as f64;
    let weighted = sorted
        .iter()
        .enumerate()
        .map(|(i, v)| (2.0 * (i + 1) as f64 - n - 1.0) * v)
        .sum::<f64>();
    weighted / (n * total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_all_zero() {
        assert_eq!(gini_coefficient(&[]), 0.0);
        assert_eq!(gini_coefficient(&[0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_equal_values() {
        assert_eq!(gini_coefficient(&[5.0, 5.0, 5.0, 5.0]), 0.0);
        assert_eq!(gini_coefficient(&[1.0]), 0.0);
    }

    #[test]
    fn test_two_values_one_holds_everything() {
        assert_eq!(gini_coefficient(&[0.0, 10.0]), 0.5);
    }

    #[test]
    fn test_maximal_concentration_is_n_minus_one_over_n() {
        let mut values = vec![0.0; 9];
        values.push(100.0);
        assert!((gini_coefficient(&values) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_permutation_invariant() {
        let a = [1.0, 7.0, 3.0, 0.0, 12.0, 4.0];
        let b = [12.0, 0.0, 4.0, 1.0, 3.0, 7.0];
        let c = [0.0, 1.0, 3.0, 4.0, 7.0, 12.0];
        let g = gini_coefficient(&a);
        assert!((g - gini_coefficient(&b)).abs() < 1e-12);
        assert!((g - gini_coefficient(&c)).abs() < 1e-12);
        assert!(g > 0.0 && g < 1.0);
    }

    #[test]
    fn test_hand_computed_value() {
        // sorted [1, 2, 3], n = 3, total = 6
        // (2 - 4) * 1 + (4 - 4) * 2 + (6 - 4) * 3 = 4 -> 4 / 18
        assert!((gini_coefficient(&[3.0, 1.0, 2.0]) - 4.0 / 18.0).abs() < 1e-12);
    }
}
