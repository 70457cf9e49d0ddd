//! makerpub CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid input
//! - 3: Project not found
//! - 4: Template error
//! - 5: External command failed

use std::process::ExitCode;

use clap::Parser;
use makerpub_core::{CoreError, FailureKind};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

mod commands;

use commands::{Cli, Commands, LogFormat, ReportFailure};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_INPUT: u8 = 2;
    pub const NOT_FOUND: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
    pub const EXTERNAL_PROCESS: u8 = 5;
}

fn main() -> ExitCode {
    // A missing .env file is fine; settings may come from the real environment.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(&cli);

    let result = match cli.command {
        Commands::Create(ref args) => commands::create::execute(&cli.global, args),
        Commands::List(ref args) => commands::list::execute(&cli.global, args),
        Commands::Rename(ref args) => commands::rename::execute(&cli.global, args),
        Commands::Delete(ref args) => commands::delete::execute(&cli.global, args),
        Commands::Publish(ref args) => commands::publish::execute(&cli.global, args),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

fn init_logging(cli: &Cli) {
    let default_directives = if cli.global.verbose {
        "makerpub=debug,info"
    } else if cli.global.quiet {
        "warn"
    } else {
        "makerpub=info,warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    let layer = match cli.global.log_format {
        LogFormat::Text => fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    if tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_err()
    {
        // Logging already initialized, continue
    }
}

/// Map an error to an exit code by its failure category.
fn categorize_error(e: &anyhow::Error) -> u8 {
    let kind = e.chain().find_map(|cause| {
        cause
            .downcast_ref::<CoreError>()
            .map(CoreError::kind)
            .or_else(|| cause.downcast_ref::<ReportFailure>().and_then(|r| r.kind))
    });

    match kind {
        Some(FailureKind::InvalidInput) => ExitCodes::INVALID_INPUT,
        Some(FailureKind::NotFound) => ExitCodes::NOT_FOUND,
        Some(FailureKind::Render) => ExitCodes::TEMPLATE_ERROR,
        Some(FailureKind::ExternalProcess) => ExitCodes::EXTERNAL_PROCESS,
        Some(FailureKind::Structural) | Some(FailureKind::Io) | None => ExitCodes::GENERAL_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use makerpub_project::ProjectError;

    #[test]
    fn test_categorize_core_errors() {
        let err = anyhow::Error::new(CoreError::from(ProjectError::NotFound("proto1".into())))
            .context("Failed to rename project");
        assert_eq!(categorize_error(&err), ExitCodes::NOT_FOUND);

        let err = anyhow::Error::new(CoreError::InvalidInput("bad".into()));
        assert_eq!(categorize_error(&err), ExitCodes::INVALID_INPUT);
    }

    #[test]
    fn test_categorize_report_failure() {
        let err = anyhow::Error::new(ReportFailure {
            operation: "publish".into(),
            failed: 2,
            kind: Some(FailureKind::ExternalProcess),
        });
        assert_eq!(categorize_error(&err), ExitCodes::EXTERNAL_PROCESS);
    }

    #[test]
    fn test_categorize_plain_error() {
        let err: anyhow::Result<()> = Err(anyhow::anyhow!("boom")).context("while testing");
        assert_eq!(categorize_error(&err.unwrap_err()), ExitCodes::GENERAL_ERROR);
    }
}
