//! Deduplicating post store and dump file format
//!
//! Posts are collected from many overlapping feeds (hot, new, top, per
//! submolt), so the same post is seen repeatedly. [`PostStore`] keys records
//! by identifier; a later record with the same identifier replaces the earlier
//! one entirely, with no field-level merge.
//!
//! # Dump format
//!
//! ```json
//! {
//!   "fetched_at": "2026-01-31T12:00:00",
//!   "total_posts": 2,
//!   "stats": { "api_calls": 4, "posts_fetched": 300, "errors": 0 },
//!   "posts": [ { "id": "a", ... }, { "id": "b", ... } ]
//! }
//! ```
//!
//! A bare JSON array of posts, or an API page whose posts sit under `data`,
//! is accepted as well. Metadata is read best-effort: counters may be floats
//! or numeric strings, and a malformed `stats` or `fetched_at` is dropped
//! without rejecting the posts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::post::{Post, RawPost, count_of};

/// Request counters recorded by the fetcher that produced a dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchStats {
    pub api_calls: u64,
    pub posts_fetched: u64,
    pub errors: u64,
}

impl FetchStats {
    /// Reads counters from a JSON object, coercing each like a post counter.
    ///
    /// Returns `None` for anything but an object.
    fn from_value(value: &Value) -> Option<Self> {
        let Value::Object(map) = value else {
            return None;
        };
        let counter = |key: &str| {
            map.get(key)
                .map_or(0, |v| u64::try_from(count_of(v)).unwrap_or(0))
        };
        Some(Self {
            api_calls: counter("api_calls"),
            posts_fetched: counter("posts_fetched"),
            errors: counter("errors"),
        })
    }
}

impl std::ops::AddAssign for FetchStats {
    fn add_assign(&mut self, rhs: Self) {
        self.api_calls += rhs.api_calls;
        self.posts_fetched += rhs.posts_fetched;
        self.errors += rhs.errors;
    }
}

/// Contents of a post dump file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "DumpRepr")]
pub struct PostDump {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<String>,
    pub total_posts: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<FetchStats>,
    pub posts: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DumpRepr {
    Envelope {
        #[serde(default)]
        fetched_at: Option<Value>,
        #[serde(default)]
        stats: Option<Value>,
        #[serde(alias = "data")]
        posts: Vec<Value>,
    },
    Bare(Vec<Value>),
}

impl From<DumpRepr> for PostDump {
    fn from(repr: DumpRepr) -> Self {
        let (fetched_at, stats, posts) = match repr {
            DumpRepr::Envelope {
                fetched_at,
                stats,
                posts,
            } => (
                fetched_at.and_then(|v| match v {
                    Value::String(s) => Some(s),
                    Value::Null => None,
                    other => {
                        tracing::warn!(value = %other, "ignoring malformed dump fetched_at");
                        None
                    }
                }),
                stats.filter(|v| !v.is_null()).and_then(|v| {
                    let stats = FetchStats::from_value(&v);
                    if stats.is_none() {
                        tracing::warn!(value = %v, "ignoring malformed dump stats");
                    }
                    stats
                }),
                posts,
            ),
            DumpRepr::Bare(posts) => (None, None, posts),
        };
        Self {
            fetched_at,
            total_posts: posts.len(),
            stats,
            posts,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum InsertOutcome {
    /// First record with this identifier.
    Inserted,
    /// An earlier record with this identifier was replaced.
    Replaced,
    /// The record had no usable identifier and was dropped.
    Skipped,
}

/// Counts of what happened while merging one dump into a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub inserted: usize,
    pub replaced: usize,
    pub skipped: usize,
}

impl MergeSummary {
    fn record(&mut self, outcome: InsertOutcome) {
        match outcome {
            InsertOutcome::Inserted => self.inserted += 1,
            InsertOutcome::Replaced => self.replaced += 1,
            InsertOutcome::Skipped => self.skipped += 1,
        }
    }
}

/// Posts keyed by identifier, latest record wins.
#[derive(Debug, Clone, Default)]
pub struct PostStore {
    posts: BTreeMap<String, RawPost>,
    fetched_at: Option<String>,
    stats: FetchStats,
    skipped: usize,
}

impl PostStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `post`, replacing any earlier record with the same identifier.
    pub fn insert(&mut self, post: RawPost) -> InsertOutcome {
        let Some(id) = post.id() else {
            self.skipped += 1;
            return InsertOutcome::Skipped;
        };
        match self.posts.insert(id, post) {
            Some(_) => InsertOutcome::Replaced,
            None => InsertOutcome::Inserted,
        }
    }

    /// Merges every post of `dump`, in file order.
    ///
    /// Entries that are not JSON objects are skipped. The fetch counters are
    /// summed and the most recent `fetched_at` is kept.
    pub fn extend_from_dump(&mut self, dump: PostDump) -> MergeSummary {
        let mut summary = MergeSummary::default();
        for value in dump.posts {
            let outcome = match RawPost::try_from(value) {
                Ok(post) => self.insert(post),
                Err(value) => {
                    tracing::warn!(kind = value_kind(&value), "skipping non-object post entry");
                    self.skipped += 1;
                    InsertOutcome::Skipped
                }
            };
            summary.record(outcome);
        }
        if let Some(stats) = dump.stats {
            self.stats += stats;
        }
        if dump.fetched_at > self.fetched_at {
            self.fetched_at = dump.fetched_at;
        }
        summary
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Number of records dropped so far for lacking an identifier.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RawPost> {
        self.posts.get(id)
    }

    /// Raw records in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &RawPost> {
        self.posts.values()
    }

    /// Normalized records in identifier order.
    #[must_use]
    pub fn normalized(&self) -> Vec<Post> {
        self.iter().map(Post::from_raw).collect()
    }

    /// Snapshot of the store in dump form.
    #[must_use]
    pub fn to_dump(&self) -> PostDump {
        let posts = self
            .iter()
            .map(|post| Value::Object(post.0.clone()))
            .collect::<Vec<_>>();
        PostDump {
            fetched_at: self.fetched_at.clone(),
            total_posts: posts.len(),
            stats: Some(self.stats),
            posts,
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
