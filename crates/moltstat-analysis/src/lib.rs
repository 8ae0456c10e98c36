//! Post normalization, classification and engagement reporting
//!
//! This crate turns heterogeneous post records collected from the Moltbook API
//! into the descriptive statistics behind the engagement write-up.
//!
//! # Overview
//!
//! 1. **Collect** ([`store::PostStore`]): Merge dump files, deduplicating by post id
//! 2. **Normalize** ([`post::Post`]): Resolve loosely-typed fields into a fixed shape
//! 3. **Classify** ([`classify`]): Label discourse type, knowledge type, length and spam
//! 4. **Report** ([`report::Report`]): Group summaries, Gini coefficients,
//!    Mann-Whitney comparisons, hourly clustering and top learning posts
//!
//! Nothing in the pipeline fails on bad data. Missing fields fall back to
//! defaults, unparseable timestamps are treated as absent, and statistics over
//! empty groups yield zero or an explicit `None`.
//!
//! # Examples
//!
//! ```
//! use moltstat_analysis::{
//!     config::AnalysisConfig,
//!     report::Report,
//!     store::{PostDump, PostStore},
//! };
//! use serde_json::json;
//!
//! let dump: PostDump = serde_json::from_value(json!({
//!     "posts": [
//!         { "id": "1", "title": "Is anyone here?", "upvotes": 3, "commentCount": 1 },
//!         { "id": "2", "title": "Built a scraper", "score": 12, "comment_count": 4 },
//!         { "id": "1", "title": "Is anyone here?", "upvotes": 5, "commentCount": 2 },
//!     ]
//! }))
//! .unwrap();
//!
//! let mut store = PostStore::new();
//! store.extend_from_dump(dump);
//! assert_eq!(store.len(), 2);
//!
//! let report = Report::build(&store.normalized(), &AnalysisConfig::default());
//! let metrics = report.metrics();
//! assert_eq!(metrics["total_upvotes"], 17.0);
//! assert_eq!(metrics["questions"], 1.0);
//! ```

pub mod classify;
pub mod config;
pub mod hourly;
pub mod learning;
pub mod post;
pub mod report;
pub mod store;
