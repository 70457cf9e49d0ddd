//! Create command - scaffold and publish a new project.

use anyhow::{Context, Result};
use clap::Args;
use makerpub_project::ProjectIdentity;
use tracing::info;

use super::GlobalArgs;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Project slug (lowercase letters, digits, `-` and `_`)
    #[arg(short, long)]
    pub name: String,

    /// Human-readable project name
    #[arg(short, long)]
    pub display_name: String,
}

pub fn execute(global: &GlobalArgs, args: &CreateArgs) -> Result<()> {
    let automation = super::automation(global)?;
    let project = ProjectIdentity::new(&args.name, &args.display_name);
    let today = chrono::Local::now().date_naive();

    info!("Creating project {}", project);
    automation
        .create_project(&project, today)
        .with_context(|| format!("Failed to create project {}", args.name))?;

    let root = automation.store().project_path(&args.name);
    println!("✅ Created {}", project);
    println!();
    println!("  📁 {}", root.display());
    println!();
    println!("Next steps:");
    println!("  Fill in {}", automation.store().metadata_path(&args.name).display());
    println!("  makerpub publish --projects {} --all-channels", args.name);

    Ok(())
}
