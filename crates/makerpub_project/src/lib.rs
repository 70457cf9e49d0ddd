//! # makerpub_project
//!
//! Project directory conventions and metadata access for makerpub.
//!
//! Every maker project lives in its own directory under a base directory:
//!
//! ```text
//! <base_dir>/<name>/
//!   metadata.yml          structured project record
//!   content/content.md    long-form body (may contain template syntax)
//!   content/README.md     authored readme body
//!   media/images/ ...     pictures, videos, 3D models
//!   src/ docs/ hardware/
//! ```
//!
//! The [`ProjectStore`] resolves these paths, reads metadata fresh on every
//! call, and owns the local create/rename/delete operations.
//!
//! ## Example
//!
//! ```rust,no_run
//! use makerpub_project::ProjectStore;
//!
//! let store = ProjectStore::new("/home/me/projects");
//! for name in store.list_projects().unwrap() {
//!     let metadata = store.read_metadata(&name).unwrap();
//!     println!("{} ({})", metadata.project.display_name, metadata.project.status);
//! }
//! ```

pub mod error;
pub mod layout;
pub mod models;
pub mod store;
pub mod value;

pub use error::{ProjectError, ProjectResult};
pub use layout::MediaType;
pub use models::*;
pub use store::ProjectStore;
pub use value::{display_value, is_truthy};
