//! Rename command - rename a project on every channel.

use anyhow::{Context, Result};
use clap::Args;
use makerpub_core::{CoreError, PublishOptions};
use makerpub_project::ProjectIdentity;

use super::GlobalArgs;

#[derive(Args, Debug)]
pub struct RenameArgs {
    /// Current project slug
    #[arg(long)]
    pub from: String,

    /// New project slug
    #[arg(long)]
    pub to: String,

    /// New human-readable name (defaults to the current one)
    #[arg(short, long)]
    pub display_name: Option<String>,
}

pub fn execute(global: &GlobalArgs, args: &RenameArgs) -> Result<()> {
    let automation = super::automation(global)?;

    let display_name = match &args.display_name {
        Some(name) => name.clone(),
        None => automation
            .store()
            .identity(&args.from)
            .map_err(CoreError::from)?
            .display_name,
    };
    let target = ProjectIdentity::new(&args.to, display_name);
    let options = PublishOptions {
        commit_message: format!("Rename {} to {}", args.from, args.to),
        ..PublishOptions::default()
    };

    let report = automation
        .rename_project(&args.from, &target, &options)
        .with_context(|| format!("Failed to rename project {}", args.from))?;
    super::finish(&report)
}
