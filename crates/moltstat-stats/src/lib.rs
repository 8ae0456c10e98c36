//! Statistical primitives for post engagement analysis.
//!
//! This crate provides:
//!
//! - **Descriptive statistics**: mean, median, sample standard deviation
//! - **Inequality**: Gini coefficient over non-negative distributions
//! - **Rank tests**: Mann-Whitney U with midrank tie correction and rank-biserial effect size
//!
//! Every function degrades to a defined value on degenerate input (empty
//! samples, all-zero totals) instead of failing, so bulk reports over
//! heterogeneous data never abort on a sparse group.
//!
//! # Modules
//!
//! - [`descriptive`]: Central tendency and dispersion
//! - [`inequality`]: Gini coefficient
//! - [`rank_test`]: Mann-Whitney U test
//!
//! # Examples
//!
//! ## Summarizing a sample
//!
//! ```
//! use moltstat_stats::descriptive::DescriptiveStats;
//!
//! let stats = DescriptiveStats::new([1.0, 2.0, 3.0, 4.0]);
//! assert_eq!(stats.mean, 2.5);
//! assert_eq!(stats.median, 2.5);
//! ```
//!
//! ## Measuring concentration
//!
//! ```
//! use moltstat_stats::inequality::gini_coefficient;
//!
//! assert_eq!(gini_coefficient(&[0.0, 0.0, 0.0, 12.0]), 0.75);
//! ```
//!
//! ## Comparing two groups
//!
//! ```
//! use moltstat_stats::rank_test::mann_whitney_u;
//!
//! let long_posts = [40.0, 55.0, 61.0];
//! let short_posts = [3.0, 12.0, 9.0, 41.0];
//! let result = mann_whitney_u(&long_posts, &short_posts).unwrap();
//! assert!(result.effect_size > 0.0);
//! ```

pub mod descriptive;
pub mod inequality;
