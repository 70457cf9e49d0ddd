//! On-disk naming conventions for project directories.

use std::fmt;

pub const METADATA_FILE: &str = "metadata.yml";
pub const CONTENT_DIR: &str = "content";
pub const CONTENT_FILE: &str = "content.md";
pub const README_FILE: &str = "README.md";
pub const GITIGNORE_FILE: &str = ".gitignore";
pub const MEDIA_DIR: &str = "media";

/// Working directories created for every new project.
pub const BASE_DIRS: [&str; 3] = ["src", "docs", "hardware"];

pub const DEFAULT_GITIGNORE: &str = "\
.DS_Store
*.tmp
*.bak
__pycache__/
node_modules/
";

/// Kinds of media kept under `media/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Images,
    Videos,
    Models,
}

impl MediaType {
    pub const ALL: [MediaType; 3] = [MediaType::Images, MediaType::Videos, MediaType::Models];

    /// Directory name below `media/`, also used as the template context key.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Images => "images",
            Self::Videos => "videos",
            Self::Models => "models",
        }
    }

    /// File-name glob patterns belonging to this media type.
    pub fn patterns(&self) -> &'static [&'static str] {
        match self {
            Self::Images => &["*.png", "*.jpg", "*.jpeg", "*.JPG", "*.JPEG"],
            Self::Videos => &["*.mp4"],
            Self::Models => &["*.stl", "*.step", "*.3mf", "*.obj"],
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}
