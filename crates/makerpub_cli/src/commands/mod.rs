//! CLI command definitions.
//!
//! Each subcommand maps to one lifecycle operation of the orchestrator.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use makerpub_core::{Automation, Config, FailureKind, FleetReport};
use makerpub_runner::SystemRunner;
use thiserror::Error;

pub mod create;
pub mod delete;
pub mod list;
pub mod publish;
pub mod rename;

/// makerpub - publish maker projects to GitHub, a Jekyll site and PDF
#[derive(Parser)]
#[command(name = "makerpub")]
#[command(version, about = "makerpub - publish maker projects everywhere at once")]
#[command(long_about = r#"
makerpub keeps a directory of maker projects in sync with their public
faces: a GitHub repository per project, posts and pages on a Jekyll site,
printable PDF documents, a raw file export and optionally a Things 3 to-do.

COMMANDS:
  create   → Scaffold a project, create its repository and publish it
  list     → Show all projects with status and start date
  rename   → Rename a project on every channel
  delete   → Remove a project from every channel and disk
  publish  → Stage and publish projects on selected channels

CONFIGURATION:
  Settings come from --config <FILE> (TOML) or from environment variables
  such as PROJECT_BASE_DIR, WEBSITE_DOMAIN, GITHUB_USERNAME and WEBSITE_DIR.
  A .env file in the working directory is loaded first.

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid input
  3 - Project not found
  4 - Template error
  5 - External command failed
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// TOML configuration file (defaults to environment variables)
    #[arg(long, global = true, env = "MAKERPUB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Print external commands instead of running them
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new project and publish it
    Create(create::CreateArgs),

    /// List all projects
    List(list::ListArgs),

    /// Rename a project everywhere
    Rename(rename::RenameArgs),

    /// Delete a project everywhere
    Delete(delete::DeleteArgs),

    /// Publish projects to channels
    Publish(publish::PublishArgs),
}

/// A fleet operation finished with failed items.
#[derive(Debug, Error)]
#[error("{operation} finished with {failed} failed step(s)")]
pub struct ReportFailure {
    pub operation: String,
    pub failed: usize,
    pub kind: Option<FailureKind>,
}

/// Load configuration and wire the orchestrator.
pub fn automation(global: &GlobalArgs) -> Result<Automation> {
    let config = Config::load(global.config.as_deref()).context("Failed to load configuration")?;

    let mut runner = SystemRunner::new();
    if global.dry_run {
        runner = runner.dry_run();
    }

    Automation::new(config, Arc::new(runner)).context("Failed to set up publishing channels")
}

/// Print a report and turn failed items into an error.
pub fn finish(report: &FleetReport) -> Result<()> {
    if report.is_success() {
        println!("✅ {}", report.to_string().trim_end());
        return Ok(());
    }

    println!("❌ {}", report.to_string().trim_end());
    Err(ReportFailure {
        operation: report.operation.clone(),
        failed: report.failed(),
        kind: report.dominant_failure(),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use makerpub_core::Channel;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "makerpub",
            "list",
            "--config",
            "site.toml",
            "--log-format",
            "json",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.global.config, Some(PathBuf::from("site.toml")));
        assert_eq!(cli.global.log_format, LogFormat::Json);
        assert!(cli.global.verbose);
        assert!(matches!(cli.command, Commands::List(_)));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["makerpub", "-v", "-q", "list"]).is_err());
    }

    #[test]
    fn test_publish_arguments() {
        let cli = Cli::try_parse_from([
            "makerpub",
            "publish",
            "--projects",
            "proto1",
            "proto2",
            "--channels",
            "web,pdf",
            "--collate-images",
            "--max-width",
            "800",
            "--filename-prepend",
            "book-",
        ])
        .unwrap();

        let Commands::Publish(args) = cli.command else {
            panic!("expected publish");
        };
        assert_eq!(args.projects, vec!["proto1", "proto2"]);
        assert_eq!(args.selected_channels(), vec![Channel::Web, Channel::Pdf]);

        let options = args.options();
        assert!(options.collate_images);
        assert_eq!(options.max_width, Some(800));
        assert_eq!(options.max_height, None);
        assert_eq!(options.filename_prepend, "book-");
        assert_eq!(options.commit_message, "Update project content");
    }

    #[test]
    fn test_publish_all_channels() {
        let cli = Cli::try_parse_from(["makerpub", "publish", "--all-projects", "--all-channels"])
            .unwrap();
        let Commands::Publish(args) = cli.command else {
            panic!("expected publish");
        };
        assert!(args.all_projects);
        assert_eq!(args.selected_channels(), Channel::PUBLISHABLE.to_vec());
    }

    #[test]
    fn test_publish_requires_selection() {
        assert!(Cli::try_parse_from(["makerpub", "publish", "--all-channels"]).is_err());
        assert!(Cli::try_parse_from(["makerpub", "publish", "--all-projects"]).is_err());
        assert!(Cli::try_parse_from([
            "makerpub",
            "publish",
            "--all-projects",
            "--channels",
            "mastodon"
        ])
        .is_err());
    }

    #[test]
    fn test_delete_requires_name() {
        assert!(Cli::try_parse_from(["makerpub", "delete"]).is_err());
        let cli = Cli::try_parse_from(["makerpub", "delete", "--name", "proto1", "--yes"]).unwrap();
        assert!(matches!(cli.command, Commands::Delete(ref args) if args.yes));
    }

    #[test]
    fn test_finish_reports_failures() {
        let mut report = FleetReport::new("publish");
        report.record::<()>(
            "proto1",
            "web stage",
            Err(makerpub_core::CoreError::InvalidInput("bad".into())),
        );

        let err = finish(&report).unwrap_err();
        let failure = err.downcast_ref::<ReportFailure>().unwrap();
        assert_eq!(failure.failed, 1);
        assert_eq!(failure.kind, Some(FailureKind::InvalidInput));
        assert!(finish(&FleetReport::new("publish")).is_ok());
    }
}
