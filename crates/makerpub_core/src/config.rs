//! Publishing configuration.
//!
//! Loaded from a TOML file when one is given, otherwise from environment
//! variables (the binary loads `.env` into the environment first).

use std::path::{Path, PathBuf};

use makerpub_templates::LinkConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult};

/// Directory under the base dir that receives raw exports.
pub const OUTPUT_DIR: &str = "_output";

/// Directory under the base dir that receives PDF documents.
pub const PDF_DIR: &str = "_pdf";

/// Settings shared by every channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub base_dir: PathBuf,
    pub website_domain: String,
    pub github_username: String,
    pub website_dir: PathBuf,
    #[serde(default = "default_posts")]
    pub website_posts: String,
    #[serde(default = "default_media")]
    pub website_media: String,
    #[serde(default = "default_pages")]
    pub website_pages: String,
    #[serde(default)]
    pub enable_roadmap: bool,
    #[serde(default)]
    pub enable_things3: bool,
    #[serde(default)]
    pub things3_area: String,
    #[serde(default = "default_pdf_command")]
    pub pdf_command: String,
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,
    #[serde(default = "default_branch")]
    pub default_branch: String,
}

fn default_posts() -> String {
    "_posts".to_string()
}

fn default_media() -> String {
    "assets/projects".to_string()
}

fn default_pages() -> String {
    "_pages".to_string()
}

fn default_pdf_command() -> String {
    "weasyprint".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

impl Config {
    /// Build a config with defaults for everything but the required values.
    pub fn new(
        base_dir: impl Into<PathBuf>,
        website_domain: impl Into<String>,
        github_username: impl Into<String>,
        website_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            base_dir: base_dir.into(),
            website_domain: website_domain.into(),
            github_username: github_username.into(),
            website_dir: website_dir.into(),
            website_posts: default_posts(),
            website_media: default_media(),
            website_pages: default_pages(),
            enable_roadmap: false,
            enable_things3: false,
            things3_area: String::new(),
            pdf_command: default_pdf_command(),
            templates_dir: None,
            default_branch: default_branch(),
        }
    }

    /// Load from `path` when given, otherwise from the process environment.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::from_env(),
        }
    }

    pub fn from_file(path: &Path) -> CoreResult<Self> {
        debug!("Loading configuration from {}", path.display());
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from a key lookup using the environment variable names.
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| CoreError::Config(format!("{} is not set", key)))
        };

        let mut config = Config::new(
            required("PROJECT_BASE_DIR")?,
            required("WEBSITE_DOMAIN")?,
            required("GITHUB_USERNAME")?,
            required("WEBSITE_DIR")?,
        );
        if let Some(v) = get("WEBSITE_POSTS") {
            config.website_posts = v;
        }
        if let Some(v) = get("WEBSITE_MEDIA") {
            config.website_media = v;
        }
        if let Some(v) = get("WEBSITE_PAGES") {
            config.website_pages = v;
        }
        if let Some(v) = get("ENABLE_ROADMAP") {
            config.enable_roadmap = parse_flag("ENABLE_ROADMAP", &v)?;
        }
        if let Some(v) = get("ENABLE_THINGS3") {
            config.enable_things3 = parse_flag("ENABLE_THINGS3", &v)?;
        }
        if let Some(v) = get("THINGS3_AREA") {
            config.things3_area = v;
        }
        if let Some(v) = get("PDF_COMMAND") {
            config.pdf_command = v;
        }
        config.templates_dir = get("TEMPLATES_DIR").map(PathBuf::from);
        if let Some(v) = get("DEFAULT_BRANCH") {
            config.default_branch = v;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CoreResult<()> {
        if self.website_domain.trim().is_empty() {
            return Err(CoreError::Config("website_domain is empty".into()));
        }
        if self.github_username.trim().is_empty() {
            return Err(CoreError::Config("github_username is empty".into()));
        }
        if self.enable_things3 && self.things3_area.trim().is_empty() {
            return Err(CoreError::Config(
                "things3_area is required when Things integration is enabled".into(),
            ));
        }
        Ok(())
    }

    pub fn links(&self) -> LinkConfig {
        LinkConfig::new(&self.website_domain, &self.github_username)
    }

    pub fn github_url(&self) -> String {
        self.links().github_url()
    }

    pub fn website_posts_dir(&self) -> PathBuf {
        self.website_dir.join(&self.website_posts)
    }

    pub fn website_media_dir(&self) -> PathBuf {
        self.website_dir.join(&self.website_media)
    }

    pub fn website_pages_dir(&self) -> PathBuf {
        self.website_dir.join(&self.website_pages)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join(OUTPUT_DIR)
    }

    pub fn pdf_dir(&self) -> PathBuf {
        self.base_dir.join(PDF_DIR)
    }
}

fn parse_flag(key: &str, value: &str) -> CoreResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(CoreError::Config(format!(
            "{} must be true or false, got '{}'",
            key, other
        ))),
    }
}
