//! Project directory access.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{ProjectError, ProjectResult};
use crate::layout::{
    MediaType, BASE_DIRS, CONTENT_DIR, CONTENT_FILE, DEFAULT_GITIGNORE, GITIGNORE_FILE,
    MEDIA_DIR, METADATA_FILE, README_FILE,
};
use crate::models::{ProjectIdentity, ProjectMetadata, ProjectSummary};

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$").expect("valid project name pattern"))
}

/// Check that a project name is a usable slug.
pub fn validate_name(name: &str) -> ProjectResult<()> {
    if name_pattern().is_match(name) {
        Ok(())
    } else {
        Err(ProjectError::InvalidName(name.to_string()))
    }
}

/// Access to all projects below a base directory.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    base_dir: PathBuf,
}

impl ProjectStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory of a project (whether or not it exists).
    pub fn project_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    pub fn metadata_path(&self, name: &str) -> PathBuf {
        self.project_path(name).join(METADATA_FILE)
    }

    pub fn content_path(&self, name: &str) -> PathBuf {
        self.project_path(name).join(CONTENT_DIR).join(CONTENT_FILE)
    }

    /// Authored readme body (input to the generated `README.md`).
    pub fn readme_source_path(&self, name: &str) -> PathBuf {
        self.project_path(name).join(CONTENT_DIR).join(README_FILE)
    }

    /// Generated readme at the project root.
    pub fn readme_path(&self, name: &str) -> PathBuf {
        self.project_path(name).join(README_FILE)
    }

    pub fn media_path(&self, name: &str, media_type: MediaType) -> PathBuf {
        self.project_path(name).join(MEDIA_DIR).join(media_type.dir_name())
    }

    /// A project exists when its directory holds a metadata file.
    pub fn exists(&self, name: &str) -> bool {
        self.metadata_path(name).is_file()
    }

    /// Resolve the project directory or fail with `NotFound`.
    pub fn require(&self, name: &str) -> ProjectResult<PathBuf> {
        if self.exists(name) {
            Ok(self.project_path(name))
        } else {
            Err(ProjectError::NotFound(name.to_string()))
        }
    }

    /// Read and parse `metadata.yml`. Always reads from disk.
    pub fn read_metadata(&self, name: &str) -> ProjectResult<ProjectMetadata> {
        let path = self.metadata_path(name);
        if !path.is_file() {
            return Err(ProjectError::NotFound(name.to_string()));
        }
        debug!("Reading metadata from {:?}", path);

        let content = fs::read_to_string(&path)?;
        serde_yaml::from_str(&content).map_err(|e| ProjectError::Structural {
            path,
            message: e.to_string(),
        })
    }

    /// Content body, `None` when the file is absent.
    pub fn read_content(&self, name: &str) -> ProjectResult<Option<String>> {
        self.require(name)?;
        read_optional(&self.content_path(name))
    }

    /// Authored readme body, `None` when the file is absent.
    pub fn read_readme(&self, name: &str) -> ProjectResult<Option<String>> {
        self.require(name)?;
        read_optional(&self.readme_source_path(name))
    }

    pub fn summary(&self, name: &str) -> ProjectResult<ProjectSummary> {
        let metadata = self.read_metadata(name)?;
        Ok(ProjectSummary::from_metadata(name, &metadata))
    }

    pub fn identity(&self, name: &str) -> ProjectResult<ProjectIdentity> {
        let metadata = self.read_metadata(name)?;
        Ok(ProjectIdentity::new(name, metadata.project.display_name))
    }

    /// Names of all project directories, sorted.
    ///
    /// Directories starting with `_` or `.` hold generated output and are
    /// skipped, as are directories without a metadata file.
    pub fn list_projects(&self) -> ProjectResult<Vec<String>> {
        let mut names = Vec::new();

        if !self.base_dir.is_dir() {
            warn!("Project base directory does not exist: {:?}", self.base_dir);
            return Ok(names);
        }

        for entry in WalkDir::new(&self.base_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('_') || name.starts_with('.') {
                continue;
            }
            if entry.path().join(METADATA_FILE).is_file() {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }

    /// Media files of one type, searched recursively, sorted by path.
    pub fn media_files(&self, name: &str, media_type: MediaType) -> ProjectResult<Vec<PathBuf>> {
        let root = self.media_path(name, media_type);
        let mut files = Vec::new();
        if !root.is_dir() {
            return Ok(files);
        }

        for pattern in media_type.patterns() {
            let pattern = glob::Pattern::new(pattern)?;
            for entry in WalkDir::new(&root).into_iter().filter_map(|e| e.ok()) {
                if entry.file_type().is_file()
                    && pattern.matches(&entry.file_name().to_string_lossy())
                {
                    files.push(entry.into_path());
                }
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    /// Media files of every type.
    pub fn all_media_files(&self, name: &str) -> ProjectResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for media_type in MediaType::ALL {
            files.extend(self.media_files(name, media_type)?);
        }
        Ok(files)
    }

    /// Scaffold a new project directory with a skeleton metadata record.
    pub fn create(&self, project: &ProjectIdentity, date_created: NaiveDate) -> ProjectResult<PathBuf> {
        validate_name(&project.name)?;
        let root = self.project_path(&project.name);
        if root.exists() {
            return Err(ProjectError::AlreadyExists(project.name.clone()));
        }

        info!("Creating project {} at {:?}", project, root);

        for dir in BASE_DIRS {
            fs::create_dir_all(root.join(dir))?;
        }
        for media_type in MediaType::ALL {
            fs::create_dir_all(self.media_path(&project.name, media_type))?;
        }
        fs::create_dir_all(root.join(CONTENT_DIR))?;

        let metadata = ProjectMetadata::new(project, date_created);
        fs::write(self.metadata_path(&project.name), serde_yaml::to_string(&metadata)?)?;
        fs::write(
            self.content_path(&project.name),
            format!("# {}\n\nDescribe the build here.\n", project.display_name),
        )?;
        fs::write(
            self.readme_source_path(&project.name),
            format!("{}\n", project.display_name),
        )?;
        fs::write(root.join(GITIGNORE_FILE), DEFAULT_GITIGNORE)?;

        Ok(root)
    }

    /// Move a project directory and record the new display name.
    pub fn rename(&self, from: &ProjectIdentity, to: &ProjectIdentity) -> ProjectResult<PathBuf> {
        validate_name(&to.name)?;
        let old_root = self.require(&from.name)?;
        let new_root = self.project_path(&to.name);

        if from.name != to.name {
            if new_root.exists() {
                return Err(ProjectError::AlreadyExists(to.name.clone()));
            }
            fs::rename(&old_root, &new_root)?;
            debug!("Moved {:?} -> {:?}", old_root, new_root);
        }

        self.set_identity(to)?;
        info!("Renamed local project {} -> {}", from, to);
        Ok(new_root)
    }

    /// Remove a project directory and everything in it.
    pub fn delete(&self, name: &str) -> ProjectResult<()> {
        let root = self.require(name)?;
        fs::remove_dir_all(&root)?;
        info!("Deleted local project {}", name);
        Ok(())
    }

    /// Rewrite `project.name` and `project.display_name`, leaving the rest of
    /// the file as authored.
    fn set_identity(&self, identity: &ProjectIdentity) -> ProjectResult<()> {
        let path = self.metadata_path(&identity.name);
        let content = fs::read_to_string(&path)?;
        let mut doc: serde_yaml::Value = serde_yaml::from_str(&content)?;

        let section = doc
            .get_mut("project")
            .and_then(serde_yaml::Value::as_mapping_mut)
            .ok_or_else(|| ProjectError::Structural {
                path: path.clone(),
                message: "missing `project` section".to_string(),
            })?;
        for (key, value) in [("name", &identity.name), ("display_name", &identity.display_name)] {
            section.insert(
                serde_yaml::Value::String(key.to_string()),
                serde_yaml::Value::String(value.clone()),
            );
        }

        fs::write(&path, serde_yaml::to_string(&doc)?)?;
        Ok(())
    }
}

fn read_optional(path: &Path) -> ProjectResult<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    Ok(Some(fs::read_to_string(path)?))
}
