//! List command - show all projects.

use anyhow::Result;
use clap::Args;

use super::GlobalArgs;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn execute(global: &GlobalArgs, args: &ListArgs) -> Result<()> {
    let automation = super::automation(global)?;
    let listing = automation.list_projects()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&listing.projects)?);
    } else if listing.projects.is_empty() {
        println!("No projects in {}", automation.store().base_dir().display());
    } else {
        let width = listing
            .projects
            .iter()
            .map(|p| p.name.len())
            .max()
            .unwrap_or(0);
        for project in &listing.projects {
            println!(
                "{:<width$}  {:<11}  {}  {}",
                project.name,
                project.status.as_str(),
                project.date_created,
                project.display_name,
                width = width
            );
        }
    }

    if listing.report.is_success() {
        Ok(())
    } else {
        super::finish(&listing.report)
    }
}
