//! Built-in template catalogue.

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::TemplateResult;

/// Every template makerpub renders, addressed by a fixed identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    GithubReadme,
    WebPost,
    WebRoadmap,
    WebLinks,
    WebAbout,
    PdfCover,
    PdfProject,
    PdfImages,
    PdfStyle,
}

impl TemplateId {
    pub const ALL: [TemplateId; 9] = [
        TemplateId::GithubReadme,
        TemplateId::WebPost,
        TemplateId::WebRoadmap,
        TemplateId::WebLinks,
        TemplateId::WebAbout,
        TemplateId::PdfCover,
        TemplateId::PdfProject,
        TemplateId::PdfImages,
        TemplateId::PdfStyle,
    ];

    /// Template name, also its relative path inside an override directory.
    pub fn path(&self) -> &'static str {
        match self {
            Self::GithubReadme => "github/README.md",
            Self::WebPost => "web/post.md",
            Self::WebRoadmap => "web/roadmap.md",
            Self::WebLinks => "web/links.md",
            Self::WebAbout => "web/about.md",
            Self::PdfCover => "pdf/cover.html",
            Self::PdfProject => "pdf/project.html",
            Self::PdfImages => "pdf/project_images.html",
            Self::PdfStyle => "pdf/style.css",
        }
    }

    fn builtin(&self) -> &'static str {
        match self {
            Self::GithubReadme => include_str!("../templates/github/README.md"),
            Self::WebPost => include_str!("../templates/web/post.md"),
            Self::WebRoadmap => include_str!("../templates/web/roadmap.md"),
            Self::WebLinks => include_str!("../templates/web/links.md"),
            Self::WebAbout => include_str!("../templates/web/about.md"),
            Self::PdfCover => include_str!("../templates/pdf/cover.html"),
            Self::PdfProject => include_str!("../templates/pdf/project.html"),
            Self::PdfImages => include_str!("../templates/pdf/project_images.html"),
            Self::PdfStyle => include_str!("../templates/pdf/style.css"),
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Fragments pulled in with `{% include %}`; not rendered on their own.
pub(crate) const PARTIALS: [(&str, &str); 1] = [(
    "shared/specifications.md",
    include_str!("../templates/shared/specifications.md"),
)];

/// Source for a template name, preferring a file in `override_dir`.
pub(crate) fn load_source(
    name: &str,
    builtin: &'static str,
    override_dir: Option<&Path>,
) -> TemplateResult<String> {
    if let Some(dir) = override_dir {
        let candidate = dir.join(name);
        if candidate.is_file() {
            debug!("Using template override {:?}", candidate);
            return Ok(fs::read_to_string(candidate)?);
        }
    }
    Ok(builtin.to_string())
}

/// All (name, source) pairs the renderer registers.
pub(crate) fn catalogue(override_dir: Option<&Path>) -> TemplateResult<Vec<(String, String)>> {
    let mut sources = Vec::new();
    for id in TemplateId::ALL {
        sources.push((id.path().to_string(), load_source(id.path(), id.builtin(), override_dir)?));
    }
    for (name, builtin) in PARTIALS {
        sources.push((name.to_string(), load_source(name, builtin, override_dir)?));
    }
    Ok(sources)
}
