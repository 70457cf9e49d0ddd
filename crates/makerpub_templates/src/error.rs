//! Error types for templates.

use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur during context building and rendering.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Failed to render {template} for {project}: {source}")]
    RenderingFailed {
        project: String,
        template: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("Invalid template {template}: {source}")]
    InvalidTemplate {
        template: String,
        #[source]
        source: minijinja::Error,
    },

    #[error(transparent)]
    Project(#[from] makerpub_project::ProjectError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
