//! Mock command runner for testing.
//!
//! Provides a configurable implementation of the CommandRunner trait that
//! records every invocation and answers with canned responses, so channel
//! handlers can be tested without `git`, `gh` or a PDF backend installed.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;

use crate::command::{CommandOutput, CommandSpec};
use crate::error::RunnerResult;
use crate::runner::CommandRunner;

/// Predefined response for matching commands.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl MockResponse {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Captured call information for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedCall {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CapturedCall {
    /// `program arg1 arg2 ...` without quoting.
    pub fn line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Mock command runner.
///
/// Responses are matched by command-line prefix; the first matching rule
/// wins and rules are never consumed. Unmatched commands succeed with empty
/// output.
#[derive(Clone, Default)]
pub struct MockRunner {
    rules: Arc<RwLock<Vec<(String, MockResponse)>>>,
    captured_calls: Arc<RwLock<Vec<CapturedCall>>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands starting with `prefix` with `response`.
    pub fn respond_to(self, prefix: impl Into<String>, response: MockResponse) -> Self {
        self.rules.write().push((prefix.into(), response));
        self
    }

    /// Shorthand for a failing response.
    pub fn fail_on(self, prefix: impl Into<String>, stderr: impl Into<String>) -> Self {
        self.respond_to(prefix, MockResponse::failure(1, stderr))
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<CapturedCall> {
        self.captured_calls.read().clone()
    }

    /// Command lines of all calls made so far.
    pub fn call_lines(&self) -> Vec<String> {
        self.captured_calls.read().iter().map(CapturedCall::line).collect()
    }

    /// Whether any call starts with `prefix`.
    pub fn was_called(&self, prefix: &str) -> bool {
        self.call_lines().iter().any(|line| line.starts_with(prefix))
    }

    pub fn clear(&self) {
        self.captured_calls.write().clear();
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, spec: &CommandSpec) -> RunnerResult<CommandOutput> {
        let call = CapturedCall {
            program: spec.program.clone(),
            args: spec.args.clone(),
            cwd: spec.cwd.clone(),
        };
        let line = call.line();
        self.captured_calls.write().push(call);

        let response = self
            .rules
            .read()
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| MockResponse::success(""));

        let now = Utc::now();
        Ok(CommandOutput {
            exit_code: response.exit_code,
            stdout: response.stdout,
            stderr: response.stderr,
            started_at: now,
            finished_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RunnerError;

    #[test]
    fn test_captures_calls_in_order() {
        let runner = MockRunner::new();
        runner.run(&CommandSpec::new("git").arg("init")).unwrap();
        runner
            .run(&CommandSpec::new("gh").args(["repo", "create", "proto1"]))
            .unwrap();

        assert_eq!(runner.call_lines(), vec!["git init", "gh repo create proto1"]);
    }

    #[test]
    fn test_prefix_rules() {
        let runner = MockRunner::new()
            .respond_to("git status", MockResponse::success(" M README.md\n"))
            .fail_on("git push", "rejected");

        let status = runner
            .run(&CommandSpec::new("git").args(["status", "--porcelain"]))
            .unwrap();
        assert_eq!(status.stdout, " M README.md\n");

        let err = runner
            .run_checked(&CommandSpec::new("git").args(["push", "origin", "main"]))
            .unwrap_err();
        assert!(matches!(err, RunnerError::NonZeroExit { code: 1, .. }));
    }

    #[test]
    fn test_records_working_directory() {
        let runner = MockRunner::new();
        runner
            .run(&CommandSpec::new("git").arg("init").current_dir("/work/proto1"))
            .unwrap();
        assert_eq!(runner.calls()[0].cwd, Some(PathBuf::from("/work/proto1")));
    }
}
