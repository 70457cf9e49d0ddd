//! Command runner trait and the process-backed implementation.

use std::process::Command;

use chrono::Utc;
use tracing::{debug, info};

use crate::command::{CommandOutput, CommandSpec};
use crate::error::{RunnerError, RunnerResult};

/// Executes external commands.
pub trait CommandRunner {
    /// Run a command and capture its output, whatever its exit status.
    fn run(&self, spec: &CommandSpec) -> RunnerResult<CommandOutput>;

    /// Run a command and fail on a non-zero exit status.
    fn run_checked(&self, spec: &CommandSpec) -> RunnerResult<CommandOutput> {
        let output = self.run(spec)?;
        if !output.success() {
            return Err(RunnerError::NonZeroExit {
                command: spec.display_line(),
                code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }

    /// Check whether a program can be launched at all.
    fn is_available(&self, program: &str) -> bool {
        self.run(&CommandSpec::new(program).arg("--version"))
            .map(|output| output.success())
            .unwrap_or(false)
    }
}

/// Runs commands as blocking child processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    dry_run: bool,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print commands instead of executing them.
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> RunnerResult<CommandOutput> {
        let started_at = Utc::now();

        if self.dry_run {
            info!("[dry-run] {}", spec.display_line());
            return Ok(CommandOutput {
                exit_code: 0,
                stdout: String::new(),
                stderr: String::new(),
                started_at,
                finished_at: started_at,
            });
        }

        let mut command = Command::new(&spec.program);
        command.args(&spec.args);
        if let Some(cwd) = &spec.cwd {
            if !cwd.is_dir() {
                return Err(RunnerError::MissingWorkingDir(cwd.clone()));
            }
            command.current_dir(cwd);
        }

        debug!("Running: {} (cwd: {:?})", spec.display_line(), spec.cwd);

        let output = command.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RunnerError::ProgramNotFound(spec.program.clone())
            } else {
                RunnerError::SpawnFailed {
                    command: spec.display_line(),
                    source: e,
                }
            }
        })?;

        let result = CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            started_at,
            finished_at: Utc::now(),
        };

        debug!(
            "Finished: {} -> {} in {}ms",
            spec.program,
            result.exit_code,
            result.duration_ms()
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dry_run_never_spawns() {
        let runner = SystemRunner::new().dry_run();
        let output = runner
            .run(&CommandSpec::new("definitely-not-a-real-program"))
            .unwrap();
        assert!(output.success());
        assert!(output.stdout.is_empty());
    }

    #[test]
    fn test_missing_program_is_reported() {
        let runner = SystemRunner::new();
        let err = runner
            .run(&CommandSpec::new("makerpub-no-such-binary-xyz"))
            .unwrap_err();
        assert!(matches!(err, RunnerError::ProgramNotFound(_)));
    }

    #[test]
    fn test_missing_working_dir_is_reported() {
        let temp = TempDir::new().unwrap();
        let gone = temp.path().join("gone");
        let runner = SystemRunner::new();
        let err = runner
            .run(&CommandSpec::new("git").current_dir(&gone))
            .unwrap_err();
        assert!(matches!(err, RunnerError::MissingWorkingDir(p) if p == gone));
    }
}
