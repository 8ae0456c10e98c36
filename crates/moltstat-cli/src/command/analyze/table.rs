//! Text rendering of the engagement report

use std::{collections::BTreeMap, fmt::Display};

use moltstat_analysis::{
    learning::LearningPost,
    report::{
        Comparisons, GroupComparison, GroupSummary, Report, SubmoltSummary, TemporalSummary,
    },
};

use crate::util::truncate_chars;

const TITLE_WIDTH: usize = 60;

fn print_group_header(label_col: &str) {
    println!(
        "  {:<12} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        label_col, "Posts", "Mean(Up)", "Med(Up)", "Std(Up)", "Mean(Cm)", "Med(Cm)", "Std(Cm)",
    );
    // label(12) + posts(8) + 6 stats(10) + spaces(7)
    println!("  {}", "-".repeat(87));
}

fn print_group_row(label: &dyn Display, group: &GroupSummary) {
    println!(
        "  {:<12} {:>8} {:>10.2} {:>10.1} {:>10.2} {:>10.2} {:>10.1} {:>10.2}",
        label.to_string(),
        group.posts,
        group.upvotes.mean,
        group.upvotes.median,
        group.upvotes.std_dev,
        group.comments.mean,
        group.comments.median,
        group.comments.std_dev,
    );
}

pub(super) fn print_overall(report: &Report) {
    println!("Overall:");
    print_group_header("");
    print_group_row(&"all", &report.overall);
    println!();
    println!(
        "  Total upvotes: {:.0}, total comments: {:.0}",
        report.overall.upvotes.total, report.overall.comments.total
    );
    println!(
        "  Gini (upvotes): {:.3}, Gini (comments): {:.3}",
        report.gini_upvotes, report.gini_comments
    );
    let spam_note = if report.spam_excluded {
        "excluded"
    } else {
        "included"
    };
    println!("  Spam posts: {} ({spam_note})", report.spam_posts);
    match report.statement_question_ratio() {
        Some(ratio) => println!("  Statement/question ratio: {ratio:.2}"),
        None => println!("  Statement/question ratio: N/A"),
    }
}

pub(super) fn print_groups<K>(title: &str, groups: &BTreeMap<K, GroupSummary>)
where
    K: Display,
{
    println!("By {title}:");
    print_group_header(title);
    for (key, group) in groups {
        print_group_row(key, group);
    }
}

fn print_comparison_row(label: &str, comparison: Option<&GroupComparison>) {
    match comparison {
        Some(c) => println!(
            "  {:<36} {:>10.1} {:>8.3} {:>6} {:>6}",
            label, c.u, c.effect_size, c.n1, c.n2
        ),
        None => println!(
            "  {:<36} {:>10} {:>8} {:>6} {:>6}",
            label, "N/A", "N/A", "-", "-"
        ),
    }
}

pub(super) fn print_comparisons(comparisons: &Comparisons) {
    println!("Mann-Whitney U Tests:");
    println!(
        "  {:<36} {:>10} {:>8} {:>6} {:>6}",
        "Comparison", "U", "Effect", "n1", "n2"
    );
    println!("  {}", "-".repeat(70));
    print_comparison_row(
        "statement vs question (upvotes)",
        comparisons.statement_vs_question_upvotes.as_ref(),
    );
    print_comparison_row(
        "statement vs question (comments)",
        comparisons.statement_vs_question_comments.as_ref(),
    );
    print_comparison_row(
        "procedural vs conceptual (upvotes)",
        comparisons.procedural_vs_conceptual_upvotes.as_ref(),
    );
    print_comparison_row(
        "long vs short (upvotes)",
        comparisons.long_vs_short_upvotes.as_ref(),
    );
    println!("  Effect > 0: first group ranks higher");
}

pub(super) fn print_temporal(temporal: &TemporalSummary) {
    println!("Temporal Clustering (UTC):");
    println!("  Timestamped posts: {}", temporal.timestamped_posts);
    let Some(peak) = temporal.peak else {
        println!("  Peak hour: N/A");
        return;
    };
    println!(
        "  Peak hour: {:02}:00 ({} posts, {:.1}%)",
        peak.hour, peak.count, peak.pct
    );
    println!(
        "  Clustering factor: {:.2}x uniform",
        peak.clustering_factor()
    );
    let verdict = if temporal.has_scheduling_signature() {
        "yes"
    } else {
        "no"
    };
    println!(
        "  Scheduling signature (> {:.1}%): {verdict}",
        temporal.scheduling_threshold_pct
    );
}

pub(super) fn print_learning_posts(posts: &[LearningPost]) {
    println!("Top Learning Posts:");
    if posts.is_empty() {
        println!("  (none)");
        return;
    }
    println!(
        "  {:<width$} {:>8} {:>8}",
        "Title",
        "Comments",
        "Upvotes",
        width = TITLE_WIDTH
    );
    println!("  {}", "-".repeat(TITLE_WIDTH + 18));
    for post in posts {
        println!(
            "  {:<width$} {:>8} {:>8}",
            truncate_chars(&post.title, TITLE_WIDTH),
            post.comments,
            post.upvotes,
            width = TITLE_WIDTH
        );
    }
}

pub(super) fn print_submolts(distinct: usize, submolts: &[SubmoltSummary]) {
    println!("Top Submolts ({distinct} with posts):");
    if submolts.is_empty() {
        println!("  (none)");
        return;
    }
    println!(
        "  {:<24} {:>8} {:>10} {:>10} {:>10}",
        "Submolt", "Posts", "Comments", "Mean(Up)", "Mean(Cm)"
    );
    // name(24) + posts(8) + 3 columns(10) + spaces(4)
    println!("  {}", "-".repeat(66));
    for submolt in submolts {
        let group = &submolt.summary;
        println!(
            "  {:<24} {:>8} {:>10.0} {:>10.2} {:>10.2}",
            format!("m/{}", truncate_chars(&submolt.name, 22)),
            group.posts,
            group.comments.total,
            group.upvotes.mean,
            group.comments.mean,
        );
    }
}
