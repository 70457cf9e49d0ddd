//! Error types for the core module.

use std::fmt;

use makerpub_project::ProjectError;
use makerpub_runner::RunnerError;
use makerpub_templates::TemplateError;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur during publishing operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Command(#[from] RunnerError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Copy failed: {0}")]
    Copy(#[from] fs_extra::error::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Classify the error for reporting and exit codes.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Project(e) => project_kind(e),
            Self::Template(e) => match e {
                TemplateError::NotFound(_) => FailureKind::NotFound,
                TemplateError::RenderingFailed { .. } | TemplateError::InvalidTemplate { .. } => {
                    FailureKind::Render
                }
                TemplateError::Project(e) => project_kind(e),
                TemplateError::Json(_) => FailureKind::Structural,
                TemplateError::Io(_) => FailureKind::Io,
            },
            Self::Command(_) => FailureKind::ExternalProcess,
            Self::Config(_) | Self::InvalidInput(_) | Self::Toml(_) => FailureKind::InvalidInput,
            Self::Io(_) | Self::Copy(_) => FailureKind::Io,
            Self::Json(_) => FailureKind::Structural,
        }
    }
}

fn project_kind(error: &ProjectError) -> FailureKind {
    match error {
        ProjectError::NotFound(_) => FailureKind::NotFound,
        ProjectError::Structural { .. } | ProjectError::Yaml(_) => FailureKind::Structural,
        ProjectError::AlreadyExists(_) | ProjectError::InvalidName(_) | ProjectError::Pattern(_) => {
            FailureKind::InvalidInput
        }
        ProjectError::Io(_) => FailureKind::Io,
    }
}

/// Failure categories shared by reports and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotFound,
    ExternalProcess,
    Render,
    Structural,
    InvalidInput,
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not found",
            Self::ExternalProcess => "external process failure",
            Self::Render => "render error",
            Self::Structural => "structural error",
            Self::InvalidInput => "invalid input",
            Self::Io => "io error",
        };
        f.write_str(label)
    }
}
