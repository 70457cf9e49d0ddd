//! Error types for project access.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for project operations.
pub type ProjectResult<T> = Result<T, ProjectError>;

/// Errors that can occur while reading or changing project directories.
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("Project not found: {0}")]
    NotFound(String),

    #[error("Project already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid project name '{0}': use lowercase letters, digits, '-' or '_'")]
    InvalidName(String),

    #[error("Invalid metadata in {path}: {message}")]
    Structural { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid media pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}
