use std::path::PathBuf;

use clap::Args;

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct MergeArg {
    /// Post dump JSON files, merged in order; later files win on duplicate ids
    #[arg(required = true)]
    pub dumps: Vec<PathBuf>,

    /// Output file path (stdout when omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &MergeArg) -> anyhow::Result<()> {
    let store = util::load_post_store(&arg.dumps)?;
    Output::save_json(&store.to_dump(), arg.output.clone())
}
