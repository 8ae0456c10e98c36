use std::path::PathBuf;

use clap::Args;
use moltstat_analysis::classify::{Classification, ClassifierConfig};

use super::analyze::MatchModeArg;
use crate::util::{self, truncate_chars};

const TITLE_WIDTH: usize = 50;

#[derive(Debug, Clone, Args)]
pub(crate) struct ClassifyArg {
    /// Classify every post in this dump file instead of the given titles
    #[arg(long, conflicts_with = "titles")]
    pub file: Option<PathBuf>,

    /// Keyword matching mode
    #[arg(long, value_enum, default_value = "substring")]
    pub match_mode: MatchModeArg,

    /// Titles to classify
    #[arg(required_unless_present = "file")]
    pub titles: Vec<String>,
}

pub(crate) fn run(arg: &ClassifyArg) -> anyhow::Result<()> {
    let config = ClassifierConfig {
        match_mode: arg.match_mode.into(),
        ..ClassifierConfig::default()
    };

    let posts = match &arg.file {
        Some(path) => util::load_post_store(std::slice::from_ref(path))?
            .normalized()
            .into_iter()
            .map(|post| (post.title, post.body))
            .collect::<Vec<_>>(),
        None => arg
            .titles
            .iter()
            .map(|title| (title.clone(), String::new()))
            .collect(),
    };

    println!(
        "  {:<width$} {:>10} {:>10} {:>7} {:>5}",
        "Title",
        "Knowledge",
        "Discourse",
        "Length",
        "Spam",
        width = TITLE_WIDTH
    );
    println!("  {}", "-".repeat(TITLE_WIDTH + 36));
    for (title, body) in &posts {
        let class = Classification::of(title, body, &config);
        println!(
            "  {:<width$} {:>10} {:>10} {:>7} {:>5}",
            truncate_chars(title, TITLE_WIDTH),
            class.knowledge.key(),
            class.discourse.key(),
            class.length.key(),
            if class.is_spam { "yes" } else { "no" },
            width = TITLE_WIDTH
        );
    }
    Ok(())
}
