use clap::{Parser, Subcommand};

use self::{
    analyze::AnalyzeArg, classify::ClassifyArg, hourly::HourlyArg, merge::MergeArg,
};

mod analyze;
mod classify;
mod hourly;
mod merge;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Analyze post dumps and report engagement statistics
    Analyze(#[clap(flatten)] AnalyzeArg),
    /// Print classification labels for titles or dumped posts
    Classify(#[clap(flatten)] ClassifyArg),
    /// Merge post dumps into a single deduplicated dump
    Merge(#[clap(flatten)] MergeArg),
    /// Print the hour-of-day posting histogram
    Hourly(#[clap(flatten)] HourlyArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Analyze(arg) => analyze::run(&arg)?,
        Mode::Classify(arg) => classify::run(&arg)?,
        Mode::Merge(arg) => merge::run(&arg)?,
        Mode::Hourly(arg) => hourly::run(&arg)?,
    }
    Ok(())
}
