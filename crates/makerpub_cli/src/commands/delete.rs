//! Delete command - remove a project from every channel and disk.

use anyhow::{Context, Result};
use clap::Args;
use makerpub_core::CoreError;

use super::GlobalArgs;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Project slug
    #[arg(short, long)]
    pub name: String,

    /// Confirm deletion of the repository, site content and local files
    #[arg(long)]
    pub yes: bool,
}

pub fn execute(global: &GlobalArgs, args: &DeleteArgs) -> Result<()> {
    if !args.yes {
        return Err(CoreError::InvalidInput(format!(
            "refusing to delete {} without --yes",
            args.name
        ))
        .into());
    }

    let automation = super::automation(global)?;
    let report = automation
        .delete_project(&args.name)
        .with_context(|| format!("Failed to delete project {}", args.name))?;
    super::finish(&report)
}
