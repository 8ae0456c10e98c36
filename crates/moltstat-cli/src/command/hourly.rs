use std::path::PathBuf;

use clap::Args;
use moltstat_analysis::hourly::HourlyDistribution;

use crate::util;

const BAR_WIDTH: u64 = 50;

#[derive(Debug, Clone, Args)]
pub(crate) struct HourlyArg {
    /// Post dump JSON files, merged in order
    #[arg(required = true)]
    pub dumps: Vec<PathBuf>,
}

pub(crate) fn run(arg: &HourlyArg) -> anyhow::Result<()> {
    let store = util::load_post_store(&arg.dumps)?;
    let posts = store.normalized();
    let dist = HourlyDistribution::from_posts(&posts);

    println!("Posts by Hour (UTC)");
    println!("  {} of {} posts carry a timestamp\n", dist.total(), posts.len());

    let max = dist.counts.iter().copied().max().unwrap_or(0);
    for (hour, &count) in dist.counts.iter().enumerate() {
        let bar = if max == 0 { 0 } else { count * BAR_WIDTH / max };
        println!(
            "  {hour:02}:00 {count:>6} {}",
            "#".repeat(usize::try_from(bar)?)
        );
    }

    println!();
    match dist.peak() {
        Some(peak) => println!(
            "  Peak: {:02}:00 with {} posts ({:.1}%, {:.2}x uniform)",
            peak.hour,
            peak.count,
            peak.pct,
            peak.clustering_factor()
        ),
        None => println!("  Peak: N/A"),
    }
    Ok(())
}
