//! Static-site channel: Jekyll posts, project media and index pages.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use chrono::NaiveDate;
use makerpub_project::{MediaType, ProjectIdentity, ProjectStore, ProjectSummary, Status};
use makerpub_runner::CommandRunner;
use makerpub_templates::{Context, TemplateId, TemplateRenderer};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{replace_existing, Channel, ChannelHandler, PublishOptions};
use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::git::GitOps;

/// Sections of the roadmap page, in display order.
const ROADMAP_GROUPS: [(Status, &str); 3] = [
    (Status::InProgress, "In progress"),
    (Status::Backlog, "Backlog"),
    (Status::Complete, "Complete"),
];

/// Writes project pages into a static-site checkout.
pub struct WebHandler {
    config: Rc<Config>,
    store: ProjectStore,
    renderer: Rc<TemplateRenderer>,
    runner: Arc<dyn CommandRunner>,
}

impl WebHandler {
    pub fn new(
        config: Rc<Config>,
        store: ProjectStore,
        renderer: Rc<TemplateRenderer>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            config,
            store,
            renderer,
            runner,
        }
    }

    pub fn post_path(&self, name: &str, date: NaiveDate) -> PathBuf {
        self.config
            .website_posts_dir()
            .join(format!("{}-{}.md", date.format("%Y-%m-%d"), name))
    }

    pub fn media_dir(&self, name: &str) -> PathBuf {
        self.config.website_media_dir().join(name)
    }

    /// Existing posts for a project, whatever their date prefix.
    fn existing_posts(&self, name: &str) -> CoreResult<Vec<(NaiveDate, PathBuf)>> {
        let dir = self.config.website_posts_dir();
        let mut posts = Vec::new();
        if !dir.is_dir() {
            return Ok(posts);
        }
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if let Some(date) = post_date(&path, name) {
                posts.push((date, path));
            }
        }
        posts.sort();
        Ok(posts)
    }

    /// Copy the project's images into the site and return their URLs.
    fn sync_media(&self, name: &str) -> CoreResult<Vec<String>> {
        let target = self.media_dir(name);
        if target.exists() {
            fs::remove_dir_all(&target)?;
        }

        let images = self.store.media_files(name, MediaType::Images)?;
        if images.is_empty() {
            return Ok(Vec::new());
        }

        fs::create_dir_all(&target)?;
        fs_extra::copy_items(&images, &target, &replace_existing())?;
        debug!("Copied {} images for {} to {:?}", images.len(), name, target);

        let prefix = self.config.website_media.trim_matches('/');
        Ok(images
            .iter()
            .filter_map(|path| path.file_name())
            .map(|file| format!("/{}/{}/{}", prefix, name, file.to_string_lossy()))
            .collect())
    }

    fn write_page(&self, file: &str, template: TemplateId, context: &Context) -> CoreResult<()> {
        let dir = self.config.website_pages_dir();
        fs::create_dir_all(&dir)?;
        let page = self.renderer.render_page(template, context)?;
        fs::write(dir.join(file), page)?;
        debug!("Wrote site page {}", file);
        Ok(())
    }

    fn entry(&self, project: &ProjectSummary) -> Value {
        let mut entry = json!({
            "name": project.name,
            "display_name": project.display_name,
            "date_created": project.date_created.to_string(),
            "status": project.status.as_str(),
        });
        if project.status == Status::Complete {
            entry["website"] = json!(self.renderer.processor().links().project_website(&project.name));
        }
        entry
    }
}

/// Date prefix of `<date>-<name>.md`, if `path` is a post for `name`.
fn post_date(path: &Path, name: &str) -> Option<NaiveDate> {
    let file = path.file_name()?.to_str()?;
    let rest = file.get(11..)?;
    if rest != format!("{}.md", name) || file.as_bytes().get(10) != Some(&b'-') {
        return None;
    }
    NaiveDate::parse_from_str(&file[..10], "%Y-%m-%d").ok()
}

impl ChannelHandler for WebHandler {
    fn channel(&self) -> Channel {
        Channel::Web
    }

    fn stage(&self, name: &str, _options: &PublishOptions) -> CoreResult<()> {
        let metadata = self.store.read_metadata(name)?;
        let images = self.sync_media(name)?;

        let mut base = Context::new();
        base.insert("images".into(), json!(images));
        let post = self
            .renderer
            .process_template(name, TemplateId::WebPost, base)?;

        let path = self.post_path(name, metadata.project.date_created);
        for (_, stale) in self.existing_posts(name)? {
            if stale != path {
                fs::remove_file(&stale)?;
                debug!("Removed stale post {:?}", stale);
            }
        }
        fs::create_dir_all(self.config.website_posts_dir())?;
        fs::write(&path, post)?;
        info!("Staged site post for {} at {:?}", name, path);
        Ok(())
    }

    fn publish(&self, name: &str, _options: &PublishOptions) -> CoreResult<()> {
        debug!("Site content for {} goes out with the site index", name);
        Ok(())
    }

    fn stage_index(&self, projects: &[ProjectSummary]) -> CoreResult<()> {
        let links = self.renderer.processor().links();

        if self.config.enable_roadmap {
            let groups: Vec<Value> = ROADMAP_GROUPS
                .iter()
                .filter_map(|(status, title)| {
                    let members: Vec<Value> = projects
                        .iter()
                        .filter(|p| p.status == *status)
                        .map(|p| self.entry(p))
                        .collect();
                    (!members.is_empty()).then(|| json!({ "title": title, "projects": members }))
                })
                .collect();
            let mut context = Context::new();
            context.insert("groups".into(), Value::Array(groups));
            self.write_page("roadmap.md", TemplateId::WebRoadmap, &context)?;
        }

        let complete: Vec<Value> = projects
            .iter()
            .filter(|p| p.status == Status::Complete)
            .map(|p| self.entry(p))
            .collect();

        let mut context = Context::new();
        context.insert("website".into(), json!(links.website_domain));
        context.insert("github".into(), json!(links.github_url()));
        if !complete.is_empty() {
            context.insert("projects".into(), Value::Array(complete.clone()));
        }
        self.write_page("links.md", TemplateId::WebLinks, &context)?;

        let mut context = Context::new();
        context.insert("project_count".into(), json!(projects.len()));
        context.insert("complete_count".into(), json!(complete.len()));
        context.insert("github".into(), json!(links.github_url()));
        self.write_page("about.md", TemplateId::WebAbout, &context)?;

        info!("Staged site index for {} projects", projects.len());
        Ok(())
    }

    fn publish_index(&self, options: &PublishOptions) -> CoreResult<()> {
        let git = GitOps::new(&self.config.website_dir, self.runner.clone());
        if !git.is_initialized() {
            return Err(CoreError::Config(format!(
                "website directory {} is not a git checkout",
                self.config.website_dir.display()
            )));
        }
        if git.commit_all(&options.commit_message)? {
            git.push("origin", &self.config.default_branch, false)?;
            info!("Published website");
        } else {
            info!("No website changes to publish");
        }
        Ok(())
    }

    fn rename(&self, from: &ProjectIdentity, to: &ProjectIdentity) -> CoreResult<()> {
        for (date, post) in self.existing_posts(&from.name)? {
            let target = self.post_path(&to.name, date);
            fs::rename(&post, &target)?;
            debug!("Moved post {:?} -> {:?}", post, target);
        }
        let media = self.media_dir(&from.name);
        if media.is_dir() {
            fs::rename(&media, self.media_dir(&to.name))?;
        }
        info!("Renamed site content {} -> {}", from.name, to.name);
        Ok(())
    }

    fn delete(&self, name: &str) -> CoreResult<()> {
        for (_, post) in self.existing_posts(name)? {
            fs::remove_file(&post)?;
        }
        let media = self.media_dir(name);
        if media.is_dir() {
            fs::remove_dir_all(&media)?;
        }
        info!("Removed site content for {}", name);
        Ok(())
    }
}
