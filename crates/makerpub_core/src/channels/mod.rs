//! Publishing channels.
//!
//! A channel is one destination for a project: the source host, the static
//! site, a PDF document, a raw file export or the task tracker. The set is
//! closed, so [`Channel`] is an enum and [`Handlers::get`] matches it
//! exhaustively.

use std::fmt;
use std::str::FromStr;

use makerpub_project::{ProjectIdentity, ProjectSummary};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::files::ProjectFiles;

pub mod github;
pub mod pdf;
pub mod raw;
pub mod things;
pub mod web;

pub use github::{GhCli, GithubHandler};
pub use pdf::PdfHandler;
pub use raw::RawHandler;
pub use things::ThingsHandler;
pub use web::WebHandler;

/// Publishing destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Web,
    Github,
    Pdf,
    Raw,
    Things,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::Web,
        Channel::Github,
        Channel::Pdf,
        Channel::Raw,
        Channel::Things,
    ];

    /// Channels that carry project artifacts. The task tracker only tracks.
    pub const PUBLISHABLE: [Channel; 4] = [
        Channel::Github,
        Channel::Web,
        Channel::Pdf,
        Channel::Raw,
    ];

    /// Channels used when publishing a single project after create or rename.
    pub const DEFAULT: [Channel; 3] = [Channel::Github, Channel::Web, Channel::Pdf];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Github => "github",
            Self::Pdf => "pdf",
            Self::Raw => "raw",
            Self::Things => "things",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "web" | "jekyll" => Ok(Self::Web),
            "github" => Ok(Self::Github),
            "pdf" => Ok(Self::Pdf),
            "raw" | "files" => Ok(Self::Raw),
            "things" | "things3" => Ok(Self::Things),
            other => Err(CoreError::InvalidInput(format!("unknown channel '{}'", other))),
        }
    }
}

/// Options for a publish run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOptions {
    pub commit_message: String,
    /// Put images inside the main PDF instead of a separate document.
    pub collate_images: bool,
    /// Prefix for produced PDF file names.
    pub filename_prepend: String,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            commit_message: "Update project content".to_string(),
            collate_images: false,
            filename_prepend: String::new(),
            max_width: None,
            max_height: None,
        }
    }
}

/// One publishing destination.
///
/// Per-project operations take the project slug; index operations act on
/// the channel as a whole (site pages, the site repository).
pub trait ChannelHandler {
    fn channel(&self) -> Channel;

    /// Set up the destination for a newly created project.
    fn init(&self, _project: &ProjectIdentity) -> CoreResult<()> {
        Ok(())
    }

    /// Write the project's artifacts for this channel.
    fn stage(&self, name: &str, options: &PublishOptions) -> CoreResult<()>;

    /// Push staged artifacts to their destination.
    fn publish(&self, name: &str, options: &PublishOptions) -> CoreResult<()>;

    /// Write channel-wide pages that list projects.
    fn stage_index(&self, _projects: &[ProjectSummary]) -> CoreResult<()> {
        Ok(())
    }

    fn publish_index(&self, _options: &PublishOptions) -> CoreResult<()> {
        Ok(())
    }

    fn rename(&self, from: &ProjectIdentity, to: &ProjectIdentity) -> CoreResult<()>;

    fn delete(&self, name: &str) -> CoreResult<()>;
}

/// Copy options that overwrite files already at the destination.
pub(crate) fn replace_existing() -> fs_extra::dir::CopyOptions {
    let mut options = fs_extra::dir::CopyOptions::new();
    options.overwrite = true;
    options
}

/// The local project directory plus one handler per channel.
pub struct Handlers {
    pub files: Box<dyn ProjectFiles>,
    pub web: Box<dyn ChannelHandler>,
    pub github: Box<dyn ChannelHandler>,
    pub pdf: Box<dyn ChannelHandler>,
    pub raw: Box<dyn ChannelHandler>,
    pub things: Box<dyn ChannelHandler>,
}

impl Handlers {
    pub fn get(&self, channel: Channel) -> &dyn ChannelHandler {
        match channel {
            Channel::Web => self.web.as_ref(),
            Channel::Github => self.github.as_ref(),
            Channel::Pdf => self.pdf.as_ref(),
            Channel::Raw => self.raw.as_ref(),
            Channel::Things => self.things.as_ref(),
        }
    }
}
