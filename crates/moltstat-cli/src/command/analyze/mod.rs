//! Engagement analysis command
//!
//! Loads one or more post dumps, runs the bulk report and prints it as text
//! tables. The flat metric map is written as JSON when `--output` is given.

mod table;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, ValueEnum};
use moltstat_analysis::{classify::MatchMode, config::AnalysisConfig, report::Report};

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct AnalyzeArg {
    /// Post dump JSON files, merged in order
    #[arg(required = true)]
    pub dumps: Vec<PathBuf>,

    /// Write the metric map as JSON to this path
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Analysis configuration JSON file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Exclude spam posts from every aggregate
    #[arg(long)]
    pub exclude_spam: bool,

    /// Keyword matching mode (overrides the configuration file)
    #[arg(long, value_enum)]
    pub match_mode: Option<MatchModeArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum MatchModeArg {
    Substring,
    WordBoundary,
}

impl From<MatchModeArg> for MatchMode {
    fn from(arg: MatchModeArg) -> Self {
        match arg {
            MatchModeArg::Substring => MatchMode::Substring,
            MatchModeArg::WordBoundary => MatchMode::WordBoundary,
        }
    }
}

impl AnalyzeArg {
    /// Loads the configuration file (or defaults) and applies flag overrides.
    ///
    /// Flags only override when given; an absent flag keeps the file value.
    fn resolve_config(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = util::load_analysis_config(self.config.as_deref())?;
        if self.exclude_spam {
            config.exclude_spam = true;
        }
        if let Some(mode) = self.match_mode {
            config.classifier.match_mode = mode.into();
        }
        config.validate().context("Invalid analysis configuration")?;
        Ok(config)
    }
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let config = arg.resolve_config()?;

    let store = util::load_post_store(&arg.dumps)?;
    let posts = store.normalized();
    let report = Report::build(&posts, &config);

    println!("Moltbook Engagement Report");
    println!("==========================\n");

    table::print_overall(&report);
    println!();

    table::print_groups("Discourse", &report.discourse);
    println!();
    table::print_groups("Knowledge", &report.knowledge);
    println!();
    table::print_groups("Length", &report.length);
    println!();

    table::print_comparisons(&report.comparisons);
    println!();

    table::print_temporal(&report.temporal);
    println!();

    table::print_learning_posts(&report.learning_posts);
    println!();

    table::print_submolts(report.distinct_submolts, &report.top_submolts);

    if let Some(output) = &arg.output {
        Output::save_json(&report.metrics(), Some(output.clone()))?;
        println!("\nMetrics saved to: {}", output.display());
    }

    Ok(())
}
