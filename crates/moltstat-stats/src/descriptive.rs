//! Central tendency and dispersion over `f64` samples.
//!
//! Every function here is total: an empty (or too short) sample yields `0.0`
//! instead of an error or `NaN`, so bulk reports over sparse groups never fail.

/// Arithmetic mean of `values`.
///
/// Returns `0.0` for an empty sample.
///
/// # Examples
///
/// ```
/// # use moltstat_stats::descriptive::mean;
/// assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5);
/// assert_eq!(mean(&[]), 0.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median of `values`.
///
/// For an even number of values the two middle elements of the sorted sample
/// are averaged. Returns `0.0` for an empty sample.
///
/// # Examples
///
/// ```
/// # use moltstat_stats::descriptive::median;
/// assert_eq!(median(&[5.0, 1.0, 3.0]), 3.0);
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
/// assert_eq!(median(&[]), 0.0);
/// ```
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    median_of_sorted(&sorted)
}

fn median_of_sorted(sorted_values: &[f64]) -> f64 {
    let n = sorted_values.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 1 {
        sorted_values[n / 2]
    } else {
        (sorted_values[n / 2 - 1] + sorted_values[n / 2]) / 2.0
    }
}

/// Sample standard deviation of `values` (sum of squared deviations divided by `n - 1`).
///
/// Returns `0.0` when fewer than two values are given.
///
/// # Examples
///
/// ```
/// # use moltstat_stats::descriptive::std;
/// assert_eq!(std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), (32.0_f64 / 7.0).sqrt());
/// assert_eq!(std(&[42.0]), 0.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq = values.iter().map(|v| (v - m).powi(2)).sum::<f64>();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Descriptive statistics summarizing a sample.
///
/// An empty sample produces all-zero statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DescriptiveStats {
    /// Number of values in the sample.
    pub count: usize,
    /// Sum of all values.
    pub total: f64,
    /// The arithmetic mean.
    pub mean: f64,
    /// The median (average of the middle pair for even counts).
    pub median: f64,
    /// The sample standard deviation.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// # Examples
    ///
    /// ```
    /// # use moltstat_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0, 3.0]);
    /// assert_eq!(stats.count, 5);
    /// assert_eq!(stats.total, 15.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        Self {
            count: sorted_values.len(),
            total: sorted_values.iter().sum(),
            mean: mean(sorted_values),
            median: median_of_sorted(sorted_values),
            std_dev: std(sorted_values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample_defaults_to_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(median(&[]), 0.0);
        assert_eq!(std(&[]), 0.0);
        assert_eq!(DescriptiveStats::new([]), DescriptiveStats::default());
    }

    #[test]
    fn test_single_value_has_zero_std() {
        for x in [0.0, 1.0, -3.5, 1e9] {
            assert_eq!(std(&[x]), 0.0);
        }
    }

    #[test]
    fn test_median_even_length_averages_middle_pair() {
        assert_eq!(median(&[10.0, 1.0, 7.0, 3.0]), 5.0);
    }

    #[test]
    fn test_median_does_not_require_sorted_input() {
        assert_eq!(median(&[9.0, 1.0, 5.0]), 5.0);
    }

    #[test]
    fn test_sample_std_uses_n_minus_one() {
        // deviations from mean 2: 1, 0, 1 -> sum 2, / (3 - 1) = 1
        assert!((std(&[1.0, 2.0, 3.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_descriptive_stats_matches_free_functions() {
        let values = [3.0, 8.0, 1.0, 4.0];
        let stats = DescriptiveStats::new(values);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.total, 16.0);
        assert_eq!(stats.mean, mean(&values));
        assert_eq!(stats.median, median(&values));
        assert!((stats.std_dev - std(&values)).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "values must be sorted in ascending order")]
    fn test_from_sorted_rejects_unsorted() {
        let _ = DescriptiveStats::from_sorted(&[2.0, 1.0]);
    }
}
