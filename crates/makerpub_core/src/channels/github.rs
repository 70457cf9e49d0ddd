//! Source-host channel: one GitHub repository per project.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use makerpub_project::layout::{GITIGNORE_FILE, METADATA_FILE};
use makerpub_project::{MediaType, ProjectError, ProjectIdentity, ProjectStore, Status};
use makerpub_runner::{CommandRunner, CommandSpec};
use makerpub_templates::{Context, LinkConfig, TemplateId, TemplateRenderer, VisibilityCheck};
use serde_json::json;
use tracing::{debug, info, warn};

use super::{Channel, ChannelHandler, PublishOptions};
use crate::error::CoreResult;
use crate::git::GitOps;

const REMOTE: &str = "origin";

/// Thin wrapper over the `gh` command line client.
#[derive(Clone)]
pub struct GhCli {
    runner: Arc<dyn CommandRunner>,
    username: String,
    workdir: PathBuf,
}

impl GhCli {
    /// `workdir` is used for commands that are not tied to a checkout.
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        username: impl Into<String>,
        workdir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            username: username.into(),
            workdir: workdir.into(),
        }
    }

    /// `owner/name` for a project repository.
    pub fn full_name(&self, name: &str) -> String {
        format!("{}/{}", self.username, name)
    }

    pub fn remote_url(&self, name: &str) -> String {
        format!("git@github.com:{}.git", self.full_name(name))
    }

    fn gh<I, S>(&self, args: I, cwd: &Path) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::new("gh").args(args).current_dir(cwd)
    }

    /// Create a private repository from the checkout at `checkout`.
    pub fn create_repo(&self, name: &str, checkout: &Path) -> CoreResult<()> {
        self.runner.run_checked(&self.gh(
            ["repo", "create", name, "--private", "--source=."],
            checkout,
        ))?;
        info!("Created repository {}", self.full_name(name));
        Ok(())
    }

    pub fn rename_repo(&self, from: &str, to: &str, checkout: &Path) -> CoreResult<()> {
        let repo = self.full_name(from);
        self.runner.run_checked(&self.gh(
            ["repo", "rename", to, "--repo", repo.as_str(), "--yes"],
            checkout,
        ))?;
        info!("Renamed repository {} -> {}", repo, to);
        Ok(())
    }

    pub fn delete_repo(&self, name: &str) -> CoreResult<()> {
        let repo = self.full_name(name);
        self.runner
            .run_checked(&self.gh(["repo", "delete", repo.as_str(), "--yes"], &self.workdir))?;
        info!("Deleted repository {}", repo);
        Ok(())
    }

    /// `gh repo edit --<field> <value>` inside a checkout.
    pub fn edit_repo(&self, field: &str, value: &str, checkout: &Path) -> CoreResult<()> {
        let flag = format!("--{}", field);
        self.runner
            .run_checked(&self.gh(["repo", "edit", flag.as_str(), value], checkout))?;
        debug!("Set repository {} to {}", field, value);
        Ok(())
    }

    /// Repository visibility as reported by GitHub (`PUBLIC`, `PRIVATE`, ...).
    pub fn visibility(&self, name: &str) -> CoreResult<String> {
        let repo = self.full_name(name);
        let output = self.runner.run_checked(&self.gh(
            ["repo", "view", repo.as_str(), "--json", "visibility", "--jq", ".visibility"],
            &self.workdir,
        ))?;
        Ok(output.stdout.trim().to_string())
    }
}

impl VisibilityCheck for GhCli {
    fn is_public(&self, name: &str) -> bool {
        match self.visibility(name) {
            Ok(visibility) => visibility.eq_ignore_ascii_case("public"),
            Err(e) => {
                warn!("Could not read visibility of {}: {}", self.full_name(name), e);
                false
            }
        }
    }
}

/// Publishes each project to its own repository.
pub struct GithubHandler {
    store: ProjectStore,
    renderer: Rc<TemplateRenderer>,
    runner: Arc<dyn CommandRunner>,
    gh: GhCli,
    links: LinkConfig,
    branch: String,
}

impl GithubHandler {
    pub fn new(
        store: ProjectStore,
        renderer: Rc<TemplateRenderer>,
        runner: Arc<dyn CommandRunner>,
        gh: GhCli,
        links: LinkConfig,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            store,
            renderer,
            runner,
            gh,
            links,
            branch: branch.into(),
        }
    }

    fn git(&self, name: &str) -> GitOps {
        GitOps::new(self.store.project_path(name), self.runner.clone())
    }

    /// Image paths relative to the project root, as the readme links them.
    fn image_links(&self, name: &str) -> CoreResult<Vec<String>> {
        let root = self.store.project_path(name);
        let links = self
            .store
            .media_files(name, MediaType::Images)?
            .iter()
            .map(|path| {
                let relative = path.strip_prefix(&root).unwrap_or(path);
                relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .collect();
        Ok(links)
    }
}

impl ChannelHandler for GithubHandler {
    fn channel(&self) -> Channel {
        Channel::Github
    }

    fn init(&self, project: &ProjectIdentity) -> CoreResult<()> {
        let root = self.store.require(&project.name)?;
        let git = self.git(&project.name);

        git.init()?;
        git.add(&[GITIGNORE_FILE, METADATA_FILE])?;
        git.commit("Initial commit with metadata and .gitignore")?;
        self.gh.create_repo(&project.name, &root)?;
        git.rename_branch(&self.branch)?;
        git.push(REMOTE, &self.branch, true)?;

        info!("Initialized repository for {}", project);
        Ok(())
    }

    fn stage(&self, name: &str, _options: &PublishOptions) -> CoreResult<()> {
        self.store.require(name)?;
        let mut base = Context::new();
        base.insert("images".into(), json!(self.image_links(name)?));

        let readme = self
            .renderer
            .process_template(name, TemplateId::GithubReadme, base)?;
        fs::write(self.store.readme_path(name), readme)?;
        debug!("Wrote README for {}", name);
        Ok(())
    }

    fn publish(&self, name: &str, options: &PublishOptions) -> CoreResult<()> {
        let root = self.store.require(name)?;
        let git = self.git(name);

        if !git.has_changes()? {
            info!("No changes to publish for {}", name);
            return Ok(());
        }

        let metadata = self.store.read_metadata(name)?;
        let mut edits = Vec::new();
        if metadata.project.status == Status::Complete {
            edits.push(("homepage", self.links.project_website(name)));
        }
        if let Some(tagline) = metadata.project.tagline.as_deref().filter(|t| !t.is_empty()) {
            edits.push(("description", tagline.to_string()));
        }
        for (field, value) in edits {
            if let Err(e) = self.gh.edit_repo(field, &value, &root) {
                warn!("Could not set repository {} for {}: {}", field, name, e);
            }
        }

        git.add_all()?;
        git.commit(&options.commit_message)?;
        git.push(REMOTE, &self.branch, false)?;
        info!("Published {} to {}", name, self.gh.full_name(name));
        Ok(())
    }

    fn rename(&self, from: &ProjectIdentity, to: &ProjectIdentity) -> CoreResult<()> {
        let root = self.store.project_path(&to.name);
        if !root.is_dir() {
            return Err(ProjectError::NotFound(to.name.clone()).into());
        }
        let git = self.git(&to.name);

        git.commit_all(&format!("Rename project to {}", to.display_name))?;
        if from.name != to.name {
            self.gh.rename_repo(&from.name, &to.name, &root)?;
            git.set_remote_url(REMOTE, &self.gh.remote_url(&to.name))?;
        }
        git.push(REMOTE, &self.branch, false)?;
        Ok(())
    }

    fn delete(&self, name: &str) -> CoreResult<()> {
        self.gh.delete_repo(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use makerpub_runner::{MockResponse, MockRunner};
    use makerpub_templates::{ContextProcessor, NeverPublic};

    fn gh(mock: &MockRunner) -> GhCli {
        GhCli::new(Arc::new(mock.clone()), "maker", "/work")
    }

    #[test]
    fn test_visibility_check() {
        let mock = MockRunner::new()
            .respond_to("gh repo view maker/public", MockResponse::success("PUBLIC\n"))
            .respond_to("gh repo view maker/private", MockResponse::success("PRIVATE\n"))
            .fail_on("gh repo view maker/missing", "not found");
        let gh = gh(&mock);

        assert!(gh.is_public("public"));
        assert!(!gh.is_public("private"));
        assert!(!gh.is_public("missing"));
        assert_eq!(
            mock.call_lines()[0],
            "gh repo view maker/public --json visibility --jq .visibility"
        );
    }

    #[test]
    fn test_delete_uses_full_name() {
        let mock = MockRunner::new();
        gh(&mock).delete_repo("proto1").unwrap();
        assert_eq!(mock.call_lines(), vec!["gh repo delete maker/proto1 --yes"]);
        assert_eq!(mock.calls()[0].cwd, Some(PathBuf::from("/work")));
    }

    fn handler(dir: &Path, mock: &MockRunner) -> GithubHandler {
        let store = ProjectStore::new(dir);
        let links = LinkConfig::new("https://maker.example", "maker");
        let processor = ContextProcessor::new(store.clone(), links.clone(), Arc::new(NeverPublic));
        let renderer = Rc::new(TemplateRenderer::new(processor, None).unwrap());
        GithubHandler::new(store, renderer, Arc::new(mock.clone()), gh(mock), links, "main")
    }

    #[test]
    fn test_publish_skips_clean_repository() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProjectStore::new(dir.path());
        store
            .create(
                &ProjectIdentity::new("proto1", "Prototype One"),
                chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            )
            .unwrap();
        let mock = MockRunner::new();

        handler(dir.path(), &mock)
            .publish("proto1", &PublishOptions::default())
            .unwrap();
        assert_eq!(mock.call_lines(), vec!["git status --porcelain"]);
    }
}
