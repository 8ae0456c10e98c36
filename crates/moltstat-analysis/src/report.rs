//! Bulk engagement report
//!
//! [`Report::build`] runs the whole analysis over a set of normalized posts in
//! a single pass:
//!
//! 1. Classify every post (discourse, knowledge type, length, spam)
//! 2. Summarize upvotes and comments overall and per group
//! 3. Compare groups with Mann-Whitney U tests
//! 4. Measure participation inequality with Gini coefficients
//! 5. Build the hourly distribution and find the peak hour
//! 6. Rank learning-related posts
//! 7. Rank submolts by post count
//!
//! [`Report::metrics`] flattens the result into a name → value map suitable
//! for a JSON results file.
//!
//! # Examples
//!
//! ```
//! use moltstat_analysis::{config::AnalysisConfig, post::Post, report::Report};
//!
//! let posts = vec![
//!     Post { title: "Why?".into(), upvotes: 4, comments: 2, ..Post::default() },
//!     Post { title: "Built a tool".into(), upvotes: 10, comments: 6, ..Post::default() },
//! ];
//! let report = Report::build(&posts, &AnalysisConfig::default());
//! let metrics = report.metrics();
//! assert_eq!(metrics["total_posts"], 2.0);
//! assert_eq!(metrics["q_mean_upvotes"], 4.0);
//! assert_eq!(metrics["s_mean_upvotes"], 10.0);
//! ```

use std::{cmp::Reverse, collections::BTreeMap};

use moltstat_stats::{
    descriptive::DescriptiveStats,
    inequality::gini_coefficient,
    rank_test::{MannWhitneyU, mann_whitney_u},
};
use serde::{Deserialize, Serialize};

use crate::{
    classify::{Classification, DiscourseType, KnowledgeType, LengthBucket},
    config::AnalysisConfig,
    hourly::{HourlyDistribution, PeakHour},
    learning::{LearningPost, top_learning_posts},
    post::Post,
};

/// Flat mapping from metric name to value.
pub type Metrics = BTreeMap<String, f64>;

/// Summary statistics of one engagement counter over a group of posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterSummary {
    pub total: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl From<DescriptiveStats> for CounterSummary {
    fn from(stats: DescriptiveStats) -> Self {
        Self {
            total: stats.total,
            mean: stats.mean,
            median: stats.median,
            std_dev: stats.std_dev,
        }
    }
}

/// Engagement summary of a group of posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub posts: usize,
    pub upvotes: CounterSummary,
    pub comments: CounterSummary,
}

/// Result of comparing two groups with a Mann-Whitney U test.
///
/// A positive `effect_size` means the first-named group tends to rank higher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupComparison {
    pub u: f64,
    pub effect_size: f64,
    pub n1: usize,
    pub n2: usize,
}

impl GroupComparison {
    fn from_test(result: MannWhitneyU, n1: usize, n2: usize) -> Self {
        Self {
            u: result.u,
            effect_size: result.effect_size,
            n1,
            n2,
        }
    }
}

/// All Mann-Whitney comparisons in the report; `None` when a group is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Comparisons {
    pub statement_vs_question_upvotes: Option<GroupComparison>,
    pub statement_vs_question_comments: Option<GroupComparison>,
    pub procedural_vs_conceptual_upvotes: Option<GroupComparison>,
    pub long_vs_short_upvotes: Option<GroupComparison>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalSummary {
    pub hourly: HourlyDistribution,
    pub timestamped_posts: u64,
    pub peak: Option<PeakHour>,
    pub scheduling_threshold_pct: f64,
}

impl TemporalSummary {
    #[must_use]
    pub fn has_scheduling_signature(&self) -> bool {
        self.peak
            .is_some_and(|p| p.is_scheduling_signature(self.scheduling_threshold_pct))
    }
}

/// Engagement summary of one submolt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmoltSummary {
    pub name: String,
    pub summary: GroupSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub overall: GroupSummary,
    pub gini_upvotes: f64,
    pub gini_comments: f64,
    /// Spam posts seen in the input (whether or not they were excluded).
    pub spam_posts: usize,
    pub spam_excluded: bool,
    pub discourse: BTreeMap<DiscourseType, GroupSummary>,
    pub knowledge: BTreeMap<KnowledgeType, GroupSummary>,
    pub length: BTreeMap<LengthBucket, GroupSummary>,
    pub comparisons: Comparisons,
    pub temporal: TemporalSummary,
    pub learning_posts: Vec<LearningPost>,
    /// Submolts with a non-empty name seen among the analyzed posts.
    pub distinct_submolts: usize,
    /// Most active submolts by post count; ties in name order.
    pub top_submolts: Vec<SubmoltSummary>,
}

/// Engagement counters of a group, as `f64` samples.
#[derive(Debug, Default)]
struct Sample {
    upvotes: Vec<f64>,
    comments: Vec<f64>,
}

impl Sample {
    #[expect(clippy::cast_precision_loss)]
    fn push(&mut self, post: &Post) {
        self.upvotes.push(post.upvotes as f64);
        self.comments.push(post.comments as f64);
    }

    fn len(&self) -> usize {
        self.upvotes.len()
    }

    fn summary(&self) -> GroupSummary {
        GroupSummary {
            posts: self.len(),
            upvotes: DescriptiveStats::new(self.upvotes.iter().copied()).into(),
            comments: DescriptiveStats::new(self.comments.iter().copied()).into(),
        }
    }
}

fn compare(a: &Sample, b: &Sample, pick: fn(&Sample) -> &[f64]) -> Option<GroupComparison> {
    mann_whitney_u(pick(a), pick(b)).map(|r| GroupComparison::from_test(r, a.len(), b.len()))
}

fn upvotes(sample: &Sample) -> &[f64] {
    &sample.upvotes
}

fn comments(sample: &Sample) -> &[f64] {
    &sample.comments
}

fn grouped<K>(keys: impl IntoIterator<Item = K>) -> BTreeMap<K, Sample>
where
    K: Ord,
{
    keys.into_iter().map(|k| (k, Sample::default())).collect()
}

fn summarize<K>(groups: BTreeMap<K, Sample>) -> BTreeMap<K, GroupSummary>
where
    K: Ord,
{
    groups
        .into_iter()
        .map(|(k, sample)| (k, sample.summary()))
        .collect()
}

impl Report {
    /// Analyzes `posts` under `config`.
    ///
    /// Never fails: empty groups produce zeroed summaries and undefined
    /// comparisons.
    #[must_use]
    pub fn build(posts: &[Post], config: &AnalysisConfig) -> Self {
        let classified = posts
            .iter()
            .map(|post| (post, post.classify(&config.classifier)))
            .collect::<Vec<(&Post, Classification)>>();
        let spam_posts = classified.iter().filter(|(_, c)| c.is_spam).count();
        let included = classified
            .into_iter()
            .filter(|(_, c)| !(config.exclude_spam && c.is_spam))
            .collect::<Vec<_>>();
        tracing::info!(
            posts = posts.len(),
            included = included.len(),
            spam = spam_posts,
            "classified posts"
        );

        let mut overall = Sample::default();
        let mut discourse = grouped(DiscourseType::ALL);
        let mut knowledge = grouped(KnowledgeType::ALL);
        let mut length = grouped(LengthBucket::ALL);
        let mut submolts = BTreeMap::<&str, Sample>::new();
        for (post, class) in &included {
            overall.push(post);
            if !post.submolt.is_empty() {
                submolts.entry(post.submolt.as_str()).or_default().push(post);
            }
            // every key is pre-seeded, so lookups cannot miss
            for sample in [
                discourse.get_mut(&class.discourse),
                knowledge.get_mut(&class.knowledge),
                length.get_mut(&class.length),
            ]
            .into_iter()
            .flatten()
            {
                sample.push(post);
            }
        }

        let comparisons = Comparisons {
            statement_vs_question_upvotes: compare(
                &discourse[&DiscourseType::Statement],
                &discourse[&DiscourseType::Question],
                upvotes,
            ),
            statement_vs_question_comments: compare(
                &discourse[&DiscourseType::Statement],
                &discourse[&DiscourseType::Question],
                comments,
            ),
            procedural_vs_conceptual_upvotes: compare(
                &knowledge[&KnowledgeType::Procedural],
                &knowledge[&KnowledgeType::Conceptual],
                upvotes,
            ),
            long_vs_short_upvotes: compare(
                &length[&LengthBucket::Long],
                &length[&LengthBucket::Short],
                upvotes,
            ),
        };

        let hourly = HourlyDistribution::from_posts(included.iter().map(|(post, _)| *post));
        let temporal = TemporalSummary {
            hourly,
            timestamped_posts: hourly.total(),
            peak: hourly.peak(),
            scheduling_threshold_pct: config.scheduling_threshold_pct,
        };

        let learning_posts = top_learning_posts(
            included.iter().map(|(post, _)| *post),
            &config.learning_keywords,
            config.top_learning_posts,
        );

        let distinct_submolts = submolts.len();
        let mut top_submolts = submolts
            .into_iter()
            .map(|(name, sample)| SubmoltSummary {
                name: name.to_owned(),
                summary: sample.summary(),
            })
            .collect::<Vec<_>>();
        // stable sort keeps equal counts in name order
        top_submolts.sort_by_key(|s| Reverse(s.summary.posts));
        top_submolts.truncate(config.top_submolts);

        Self {
            overall: overall.summary(),
            gini_upvotes: gini_coefficient(&overall.upvotes),
            gini_comments: gini_coefficient(&overall.comments),
            spam_posts,
            spam_excluded: config.exclude_spam,
            discourse: summarize(discourse),
            knowledge: summarize(knowledge),
            length: summarize(length),
            comparisons,
            temporal,
            learning_posts,
            distinct_submolts,
            top_submolts,
        }
    }

    /// Ratio of statements to questions, undefined without questions.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn statement_question_ratio(&self) -> Option<f64> {
        let questions = self.discourse.get(&DiscourseType::Question)?.posts;
        let statements = self.discourse.get(&DiscourseType::Statement)?.posts;
        (questions > 0).then(|| statements as f64 / questions as f64)
    }

    /// Flattens the report into named metrics.
    ///
    /// Undefined quantities (comparisons with an empty group, the peak hour
    /// without timestamps, the statement/question ratio without questions) are
    /// left out rather than encoded as `NaN`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn metrics(&self) -> Metrics {
        let mut m = Metrics::new();
        let mut put = |name: &str, value: f64| {
            m.insert(name.to_owned(), value);
        };

        put("total_posts", self.overall.posts as f64);
        put("total_upvotes", self.overall.upvotes.total);
        put("total_comments", self.overall.comments.total);
        put_counter(&mut put, "", "upvotes", &self.overall.upvotes);
        put_counter(&mut put, "", "comments", &self.overall.comments);
        put("gini_upvotes", self.gini_upvotes);
        put("gini_comments", self.gini_comments);
        put("spam_posts", self.spam_posts as f64);

        for (kind, group) in &self.discourse {
            put_group(&mut put, kind.key(), group);
        }
        for (kind, group) in &self.knowledge {
            put_group(&mut put, kind.key(), group);
        }
        for (bucket, group) in &self.length {
            put_group(&mut put, bucket.key(), group);
        }

        // short names used by earlier result files
        let group = |kind: DiscourseType| self.discourse.get(&kind).copied().unwrap_or_default();
        let question = group(DiscourseType::Question);
        let statement = group(DiscourseType::Statement);
        put("questions", question.posts as f64);
        put("statements", statement.posts as f64);
        put("q_mean_upvotes", question.upvotes.mean);
        put("q_mean_comments", question.comments.mean);
        put("s_mean_upvotes", statement.upvotes.mean);
        put("s_mean_comments", statement.comments.mean);

        if let Some(ratio) = self.statement_question_ratio() {
            put("statement_question_ratio", ratio);
        }

        let Comparisons {
            statement_vs_question_upvotes,
            statement_vs_question_comments,
            procedural_vs_conceptual_upvotes,
            long_vs_short_upvotes,
        } = self.comparisons;
        for (name, comparison) in [
            ("mwu_statement_vs_question_upvotes", statement_vs_question_upvotes),
            ("mwu_statement_vs_question_comments", statement_vs_question_comments),
            ("mwu_procedural_vs_conceptual_upvotes", procedural_vs_conceptual_upvotes),
            ("mwu_long_vs_short_upvotes", long_vs_short_upvotes),
        ] {
            if let Some(c) = comparison {
                put(&format!("{name}_u"), c.u);
                put(&format!("{name}_effect"), c.effect_size);
                put(&format!("{name}_effect_abs"), c.effect_size.abs());
            }
        }

        put("timestamped_posts", self.temporal.timestamped_posts as f64);
        if let Some(peak) = self.temporal.peak {
            put("peak_hour", f64::from(peak.hour));
            put("peak_count", peak.count as f64);
            put("peak_pct", peak.pct);
            put("clustering_factor", peak.clustering_factor());
            put(
                "scheduling_signature",
                f64::from(u8::from(self.temporal.has_scheduling_signature())),
            );
        }

        put("distinct_submolts", self.distinct_submolts as f64);
        for submolt in &self.top_submolts {
            let prefix = format!("submolt_{}_", submolt.name);
            let group = &submolt.summary;
            put(&format!("{prefix}posts"), group.posts as f64);
            put(&format!("{prefix}total_comments"), group.comments.total);
            put(&format!("{prefix}mean_upvotes"), group.upvotes.mean);
            put(&format!("{prefix}mean_comments"), group.comments.mean);
        }

        m
    }
}

fn put_counter(put: &mut impl FnMut(&str, f64), prefix: &str, counter: &str, s: &CounterSummary) {
    put(&format!("{prefix}mean_{counter}"), s.mean);
    put(&format!("{prefix}median_{counter}"), s.median);
    put(&format!("{prefix}std_{counter}"), s.std_dev);
}

#[expect(clippy::cast_precision_loss)]
fn put_group(put: &mut impl FnMut(&str, f64), key: &str, group: &GroupSummary) {
    let prefix = format!("{key}_");
    put(&format!("{prefix}posts"), group.posts as f64);
    put_counter(put, &prefix, "upvotes", &group.upvotes);
    put_counter(put, &prefix, "comments", &group.comments);
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};

    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    fn post(title: &str, body_len: usize, upvotes: i64, comments: i64, hour: Option<u32>) -> Post {
        Post {
            title: title.to_owned(),
            body: "x".repeat(body_len),
            upvotes,
            comments,
            created_at: hour.and_then(|h| Utc.with_ymd_and_hms(2026, 1, 30, h, 0, 0).single()),
            ..Post::default()
        }
    }

    /// Three questions and two statements with hand-checkable counters.
    fn fixture() -> Vec<Post> {
        vec![
            post("What is memory?", 100, 2, 10, Some(9)),
            post("How to build a skill?", 600, 4, 20, Some(9)),
            post("Anyone awake", 2500, 6, 0, Some(14)),
            post("I built a tool", 3000, 10, 5, Some(9)),
            post("Thinking about meaning", 50, 20, 7, None),
        ]
    }

    #[test]
    fn test_end_to_end_group_means() {
        let report = Report::build(&fixture(), &AnalysisConfig::default());
        let m = report.metrics();

        assert_close(m["total_posts"], 5.0);
        assert_close(m["total_upvotes"], 42.0);
        assert_close(m["total_comments"], 42.0);

        assert_close(m["questions"], 3.0);
        assert_close(m["statements"], 2.0);
        // questions: upvotes 2, 4, 6 / comments 10, 20, 0
        assert_close(m["q_mean_upvotes"], 4.0);
        assert_close(m["q_mean_comments"], 10.0);
        // statements: upvotes 10, 20 / comments 5, 7
        assert_close(m["s_mean_upvotes"], 15.0);
        assert_close(m["s_mean_comments"], 6.0);

        assert_close(m["question_median_upvotes"], 4.0);
        assert_close(m["question_std_upvotes"], 2.0);
        assert_close(m["statement_median_comments"], 6.0);
        assert_close(m["statement_question_ratio"], 2.0 / 3.0);
    }

    #[test]
    fn test_knowledge_and_length_groups() {
        let report = Report::build(&fixture(), &AnalysisConfig::default());
        let k = |t: KnowledgeType| report.knowledge[&t].posts;
        // "How to build a skill?" and "I built a tool" are procedural;
        // "Thinking about meaning" is conceptual
        assert_eq!(k(KnowledgeType::Procedural), 2);
        assert_eq!(k(KnowledgeType::Conceptual), 1);
        assert_eq!(k(KnowledgeType::Other), 2);

        let l = |b: LengthBucket| report.length[&b].posts;
        assert_eq!(l(LengthBucket::Short), 2);
        assert_eq!(l(LengthBucket::Medium), 1);
        assert_eq!(l(LengthBucket::Long), 2);
    }

    #[test]
    fn test_comparisons() {
        let report = Report::build(&fixture(), &AnalysisConfig::default());

        // statements [10, 20] all rank above questions [2, 4, 6]
        let c = report.comparisons.statement_vs_question_upvotes.unwrap();
        assert_close(c.u, 0.0);
        assert_close(c.effect_size, 1.0);
        assert_eq!((c.n1, c.n2), (2, 3));

        let c = report.comparisons.procedural_vs_conceptual_upvotes.unwrap();
        // procedural [4, 10] vs conceptual [20]
        assert_close(c.effect_size, -1.0);

        let m = report.metrics();
        assert_close(m["mwu_statement_vs_question_upvotes_u"], 0.0);
        assert_close(m["mwu_statement_vs_question_upvotes_effect"], 1.0);
    }

    #[test]
    fn test_temporal_summary() {
        let report = Report::build(&fixture(), &AnalysisConfig::default());
        assert_eq!(report.temporal.timestamped_posts, 4);
        let peak = report.temporal.peak.unwrap();
        assert_eq!(peak.hour, 9);
        assert_eq!(peak.count, 3);
        assert_close(peak.pct, 75.0);
        assert!(report.temporal.has_scheduling_signature());

        let m = report.metrics();
        assert_close(m["peak_hour"], 9.0);
        assert_close(m["peak_pct"], 75.0);
        assert_close(m["scheduling_signature"], 1.0);
    }

    #[test]
    fn test_empty_input_degrades_to_defaults() {
        let report = Report::build(&[], &AnalysisConfig::default());
        let m = report.metrics();
        assert_close(m["total_posts"], 0.0);
        assert_close(m["mean_upvotes"], 0.0);
        assert_close(m["gini_upvotes"], 0.0);
        assert!(!m.contains_key("statement_question_ratio"));
        assert!(!m.contains_key("mwu_statement_vs_question_upvotes_u"));
        assert!(!m.contains_key("peak_hour"));
        assert!(m.values().all(|v| v.is_finite()));
    }

    #[test]
    fn test_spam_exclusion() {
        let mut posts = fixture();
        posts.push(post("mint $CLAW 02", 10, 1000, 1000, Some(3)));

        let kept = Report::build(&posts, &AnalysisConfig::default());
        assert_eq!(kept.spam_posts, 1);
        assert_eq!(kept.overall.posts, 6);

        let config = AnalysisConfig {
            exclude_spam: true,
            ..AnalysisConfig::default()
        };
        let excluded = Report::build(&posts, &config);
        assert_eq!(excluded.spam_posts, 1);
        assert_eq!(excluded.overall.posts, 5);
        assert_close(excluded.overall.upvotes.total, 42.0);
    }

    #[test]
    fn test_learning_posts_included() {
        let report = Report::build(&fixture(), &AnalysisConfig::default());
        let titles = report
            .learning_posts
            .iter()
            .map(|p| p.title.as_str())
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["How to build a skill?", "I built a tool"]);
    }

    #[test]
    #[expect(clippy::cast_precision_loss)]
    fn test_effect_abs_matches_min_u_formula() {
        let report = Report::build(&fixture(), &AnalysisConfig::default());
        let m = report.metrics();
        // procedural [4, 10] vs conceptual [20]: U = 0, n1 n2 = 2
        assert_close(m["mwu_procedural_vs_conceptual_upvotes_effect"], -1.0);
        assert_close(m["mwu_procedural_vs_conceptual_upvotes_effect_abs"], 1.0);
        let c = report.comparisons.statement_vs_question_comments.unwrap();
        let n = (c.n1 * c.n2) as f64;
        assert_close(
            m["mwu_statement_vs_question_comments_effect_abs"],
            1.0 - 2.0 * c.u / n,
        );
    }

    #[test]
    fn test_top_submolts() {
        let in_submolt = |name: &str, upvotes: i64, comments: i64| Post {
            submolt: name.to_owned(),
            upvotes,
            comments,
            ..Post::default()
        };
        let posts = vec![
            in_submolt("general", 1, 4),
            in_submolt("builds", 10, 0),
            in_submolt("general", 2, 5),
            in_submolt("", 100, 100),
            in_submolt("ai", 7, 1),
            in_submolt("general", 3, 6),
        ];
        let config = AnalysisConfig {
            top_submolts: 2,
            ..AnalysisConfig::default()
        };
        let report = Report::build(&posts, &config);
        assert_eq!(report.distinct_submolts, 3);
        let names = report
            .top_submolts
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>();
        // "ai" and "builds" tie on one post each
        assert_eq!(names, vec!["general", "ai"]);

        let general = &report.top_submolts[0].summary;
        assert_eq!(general.posts, 3);
        assert_close(general.comments.total, 15.0);
        assert_close(general.upvotes.mean, 2.0);

        let m = report.metrics();
        assert_close(m["distinct_submolts"], 3.0);
        assert_close(m["submolt_general_posts"], 3.0);
        assert_close(m["submolt_general_total_comments"], 15.0);
        assert_close(m["submolt_ai_mean_upvotes"], 7.0);
        assert!(!m.contains_key("submolt_builds_posts"));
        assert!(!m.contains_key("submolt__posts"));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = Report::build(&fixture(), &AnalysisConfig::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["discourse"]["question"]["posts"], 3);
        assert_eq!(json["length"]["long"]["posts"], 2);
    }
}
