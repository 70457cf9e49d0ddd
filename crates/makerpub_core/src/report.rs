//! Per-item results of fleet-wide operations.
//!
//! Fleet operations are best effort: each (project, step) pair is attempted
//! and its outcome recorded, and a failure never stops the remaining items.

use std::fmt;

use serde::Serialize;
use tracing::{error, info};

use crate::error::{CoreResult, FailureKind};

/// A categorized failure of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of one step for one project.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub project: String,
    pub step: String,
    pub failure: Option<Failure>,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Aggregated outcomes of a fleet operation.
#[derive(Debug, Clone, Serialize)]
pub struct FleetReport {
    pub operation: String,
    pub outcomes: Vec<Outcome>,
}

impl FleetReport {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            outcomes: Vec::new(),
        }
    }

    /// Record a step result, logging it. Returns whether it succeeded.
    pub fn record<T>(&mut self, project: &str, step: impl Into<String>, result: CoreResult<T>) -> bool {
        let step = step.into();
        let failure = match result {
            Ok(_) => {
                info!("{} {}: ok", project, step);
                None
            }
            Err(e) => {
                error!("{} {} failed ({}): {}", project, step, e.kind(), e);
                Some(Failure {
                    kind: e.kind(),
                    message: e.to_string(),
                })
            }
        };
        let success = failure.is_none();
        self.outcomes.push(Outcome {
            project: project.to_string(),
            step,
            failure,
        });
        success
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Most common failure kind, used to pick an exit code.
    pub fn dominant_failure(&self) -> Option<FailureKind> {
        let mut counts: Vec<(FailureKind, usize)> = Vec::new();
        for kind in self.failures().filter_map(|o| o.failure.as_ref().map(|f| f.kind)) {
            match counts.iter_mut().find(|(k, _)| *k == kind) {
                Some((_, n)) => *n += 1,
                None => counts.push((kind, 1)),
            }
        }
        counts.into_iter().max_by_key(|(_, n)| *n).map(|(kind, _)| kind)
    }
}

impl fmt::Display for FleetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} succeeded, {} failed",
            self.operation,
            self.succeeded(),
            self.failed()
        )?;
        for outcome in self.failures() {
            if let Some(failure) = &outcome.failure {
                writeln!(
                    f,
                    "  {} {} [{}]: {}",
                    outcome.project, outcome.step, failure.kind, failure.message
                )?;
            }
        }
        Ok(())
    }
}
