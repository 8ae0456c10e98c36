//! Posting activity by hour of day (UTC)
//!
//! Human communities post across the whole day; automated agents running on a
//! schedule pile up in a single hour. The share of posts in the busiest hour,
//! compared against the uniform share of `100 / 24` percent, is used as a
//! scheduling signature.

use serde::{Deserialize, Serialize};

use crate::post::Post;

pub const HOURS_PER_DAY: usize = 24;

/// Percentage of posts each hour would hold if activity were uniform.
pub const UNIFORM_HOUR_PCT: f64 = 100.0 / 24.0;

/// Post counts for each hour of the day.
///
/// Posts without a creation timestamp are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyDistribution {
    pub counts: [u64; HOURS_PER_DAY],
}

/// The busiest hour of a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakHour {
    pub hour: u32,
    pub count: u64,
    /// Share of timestamped posts created in this hour, in percent.
    pub pct: f64,
}

impl PeakHour {
    /// How many times more posts the peak hour holds than a uniform hour would.
    #[must_use]
    pub fn clustering_factor(&self) -> f64 {
        self.pct / UNIFORM_HOUR_PCT
    }

    #[must_use]
    pub fn is_scheduling_signature(&self, threshold_pct: f64) -> bool {
        self.pct > threshold_pct
    }
}

impl HourlyDistribution {
    pub fn from_posts<'a, I>(posts: I) -> Self
    where
        I: IntoIterator<Item = &'a Post>,
    {
        let mut counts = [0; HOURS_PER_DAY];
        for hour in posts.into_iter().filter_map(Post::created_hour) {
            counts[hour as usize] += 1;
        }
        Self { counts }
    }

    /// Number of posts with a known creation hour.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// The hour with the most posts; ties go to the earliest hour.
    ///
    /// Returns `None` when no post carries a timestamp.
    #[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    #[must_use]
    pub fn peak(&self) -> Option<PeakHour> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let (hour, &count) = self
            .counts
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|&(_, count)| count)?;
        Some(PeakHour {
            hour: hour as u32,
            count,
            pct: count as f64 / total as f64 * 100.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};

    use super::*;

    fn post_at(hour: u32) -> Post {
        Post {
            created_at: Utc.with_ymd_and_hms(2026, 1, 30, hour, 15, 0).single(),
            ..Post::default()
        }
    }

    #[test]
    fn test_posts_without_timestamp_are_excluded() {
        let posts = [post_at(3), Post::default(), post_at(3)];
        let dist = HourlyDistribution::from_posts(&posts);
        assert_eq!(dist.total(), 2);
        assert_eq!(dist.counts[3], 2);
    }

    #[test]
    fn test_empty_has_no_peak() {
        let dist = HourlyDistribution::from_posts(&[Post::default()]);
        assert_eq!(dist.total(), 0);
        assert!(dist.peak().is_none());
    }

    #[test]
    fn test_peak_and_signature() {
        // 5 of 8 posts at 14:00
        let mut posts = vec![post_at(14); 5];
        posts.extend([post_at(1), post_at(2), post_at(23)]);
        let peak = HourlyDistribution::from_posts(&posts).peak().unwrap();
        assert_eq!(peak.hour, 14);
        assert_eq!(peak.count, 5);
        assert!((peak.pct - 62.5).abs() < 1e-12);
        assert!((peak.clustering_factor() - 15.0).abs() < 1e-12);
        assert!(peak.is_scheduling_signature(15.0));
        assert!(!peak.is_scheduling_signature(70.0));
    }

    #[test]
    fn test_peak_tie_goes_to_earliest_hour() {
        let posts = [post_at(20), post_at(4), post_at(9)];
        let peak = HourlyDistribution::from_posts(&posts).peak().unwrap();
        assert_eq!(peak.hour, 4);
    }
}
