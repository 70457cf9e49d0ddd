//! # makerpub_templates
//!
//! Template context processing and rendering for makerpub.
//!
//! Publishing a project means turning its nested `metadata.yml` record into
//! text for several destinations. This crate does that in two steps:
//!
//! - [`ContextProcessor`] flattens a metadata record into a [`Context`]:
//!   derived links, dimension/weight strings, joined lists, embed groups.
//!   Empty fields are left out rather than set to empty strings.
//! - [`TemplateRenderer`] merges a caller-supplied base context with the
//!   derived one, drops empty values, resolves the project's free-text
//!   bodies as nested templates, and renders a named [`TemplateId`].
//!
//! Templates are compiled into the binary and can be overridden per file
//! from a directory on disk.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use makerpub_project::ProjectStore;
//! use makerpub_templates::{
//!     Context, ContextProcessor, LinkConfig, NeverPublic, TemplateId, TemplateRenderer,
//! };
//!
//! let store = ProjectStore::new("/home/me/projects");
//! let links = LinkConfig::new("https://example.com", "me");
//! let processor = ContextProcessor::new(store, links, Arc::new(NeverPublic));
//! let renderer = TemplateRenderer::new(processor, None).unwrap();
//!
//! let readme = renderer
//!     .process_template("proto1", TemplateId::GithubReadme, Context::new())
//!     .unwrap();
//! println!("{}", readme);
//! ```

pub mod context;
pub mod error;
pub mod renderer;
pub mod templates;

pub use context::{
    build_context, clean_context, Context, ContextProcessor, LinkConfig, NeverPublic,
    VisibilityCheck,
};
pub use error::{TemplateError, TemplateResult};
pub use renderer::TemplateRenderer;
pub use templates::TemplateId;
