//! Orchestration of project lifecycle operations across channels.

use std::rc::Rc;
use std::sync::Arc;

use chrono::NaiveDate;
use makerpub_project::store::validate_name;
use makerpub_project::{ProjectError, ProjectIdentity, ProjectStore, ProjectSummary};
use makerpub_runner::CommandRunner;
use makerpub_templates::{ContextProcessor, TemplateRenderer};
use tracing::{info, warn};

use crate::channels::{
    Channel, GhCli, GithubHandler, Handlers, PdfHandler, PublishOptions, RawHandler,
    ThingsHandler, WebHandler,
};
use crate::config::Config;
use crate::error::CoreResult;
use crate::files::LocalFiles;
use crate::report::FleetReport;

/// Label used in reports for channel-wide steps.
const SITE: &str = "site";

/// Channels whose artifacts are removed when a project is deleted.
const DELETE_ORDER: [Channel; 5] = [
    Channel::Github,
    Channel::Web,
    Channel::Pdf,
    Channel::Raw,
    Channel::Things,
];

/// Summaries of readable projects plus a report of the unreadable ones.
#[derive(Debug)]
pub struct ProjectListing {
    pub projects: Vec<ProjectSummary>,
    pub report: FleetReport,
}

/// Runs create, rename, delete and publish across all channels.
pub struct Automation {
    store: ProjectStore,
    handlers: Handlers,
}

impl Automation {
    /// Wire the real handlers for `config`, running commands via `runner`.
    pub fn new(config: Config, runner: Arc<dyn CommandRunner>) -> CoreResult<Self> {
        let config = Rc::new(config);
        let store = ProjectStore::new(&config.base_dir);
        let gh = GhCli::new(runner.clone(), &config.github_username, &config.base_dir);

        let processor = ContextProcessor::new(store.clone(), config.links(), Arc::new(gh.clone()));
        let renderer = Rc::new(TemplateRenderer::new(
            processor,
            config.templates_dir.as_deref(),
        )?);

        let handlers = Handlers {
            files: Box::new(LocalFiles::new(store.clone())),
            web: Box::new(WebHandler::new(
                config.clone(),
                store.clone(),
                renderer.clone(),
                runner.clone(),
            )),
            github: Box::new(GithubHandler::new(
                store.clone(),
                renderer.clone(),
                runner.clone(),
                gh,
                config.links(),
                &config.default_branch,
            )),
            pdf: Box::new(PdfHandler::new(
                config.clone(),
                store.clone(),
                renderer,
                runner.clone(),
            )),
            raw: Box::new(RawHandler::new(config.clone(), store.clone())),
            things: Box::new(ThingsHandler::new(
                config.enable_things3,
                &config.things3_area,
                runner,
                &config.base_dir,
            )),
        };

        info!("Using projects in {}", config.base_dir.display());
        Ok(Self::with_handlers(store, handlers))
    }

    pub fn with_handlers(store: ProjectStore, handlers: Handlers) -> Self {
        Self { store, handlers }
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    /// Stage, publish and index `projects` on `channels`, best effort.
    ///
    /// A project is only published on a channel where it staged cleanly.
    pub fn publish(
        &self,
        projects: &[String],
        channels: &[Channel],
        options: &PublishOptions,
    ) -> FleetReport {
        let mut report = FleetReport::new("publish");
        let mut staged = Vec::new();

        for name in projects {
            for &channel in channels {
                let result = self.handlers.get(channel).stage(name, options);
                if report.record(name, format!("{} stage", channel), result) {
                    staged.push((name, channel));
                }
            }
        }

        for (name, channel) in staged {
            let result = self.handlers.get(channel).publish(name, options);
            report.record(name, format!("{} publish", channel), result);
        }

        if channels.is_empty() {
            return report;
        }
        match self.index_summaries() {
            Ok(summaries) => {
                for &channel in channels {
                    let handler = self.handlers.get(channel);
                    if report.record(
                        SITE,
                        format!("{} stage index", channel),
                        handler.stage_index(&summaries),
                    ) {
                        report.record(
                            SITE,
                            format!("{} publish index", channel),
                            handler.publish_index(options),
                        );
                    }
                }
            }
            Err(e) => {
                report.record::<()>(SITE, "list projects", Err(e));
            }
        }

        info!("{}", report.to_string().trim_end());
        report
    }

    /// Stage and publish one project on the default channels. Stops at the
    /// first failure.
    pub fn publish_project(&self, name: &str, options: &PublishOptions) -> CoreResult<()> {
        for channel in Channel::DEFAULT {
            self.handlers.get(channel).stage(name, options)?;
        }
        for channel in Channel::DEFAULT {
            self.handlers.get(channel).publish(name, options)?;
        }
        let summaries = self.index_summaries()?;
        for channel in Channel::DEFAULT {
            let handler = self.handlers.get(channel);
            handler.stage_index(&summaries)?;
            handler.publish_index(options)?;
        }
        info!("Published {}", name);
        Ok(())
    }

    /// Scaffold a project, create its repository and task, then publish it.
    pub fn create_project(&self, project: &ProjectIdentity, date_created: NaiveDate) -> CoreResult<()> {
        self.handlers.files.create(project, date_created)?;
        self.handlers.github.init(project)?;
        self.handlers.things.init(project)?;

        let options = PublishOptions {
            commit_message: format!("Add {}", project.display_name),
            ..PublishOptions::default()
        };
        self.publish_project(&project.name, &options)?;
        info!("Created project {}", project);
        Ok(())
    }

    /// Rename a project everywhere.
    ///
    /// Every step runs even when an earlier one fails; there is no rollback.
    /// The returned report says which steps need manual attention.
    pub fn rename_project(
        &self,
        from: &str,
        to: &ProjectIdentity,
        options: &PublishOptions,
    ) -> CoreResult<FleetReport> {
        validate_name(&to.name)?;
        let old = self.store.identity(from)?;
        if to.name != old.name && self.store.project_path(&to.name).exists() {
            return Err(ProjectError::AlreadyExists(to.name.clone()).into());
        }

        info!("Renaming {} -> {}", old, to);
        let mut report = FleetReport::new("rename");
        let label = to.name.as_str();

        report.record(label, "things rename", self.handlers.things.rename(&old, to));
        report.record(label, "files rename", self.handlers.files.rename(&old, to));
        report.record(label, "web rename", self.handlers.web.rename(&old, to));
        report.record(label, "github rename", self.handlers.github.rename(&old, to));
        report.record(label, "pdf rename", self.handlers.pdf.rename(&old, to));
        report.record(label, "raw rename", self.handlers.raw.rename(&old, to));
        report.record(label, "publish", self.publish_project(&to.name, options));

        if !report.is_success() {
            warn!("Rename of {} finished with {} failed step(s)", old.name, report.failed());
        }
        Ok(report)
    }

    /// Remove a project's artifacts from every channel, then its directory.
    pub fn delete_project(&self, name: &str) -> CoreResult<FleetReport> {
        self.store.require(name)?;
        let mut report = FleetReport::new("delete");

        for channel in DELETE_ORDER {
            let result = self.handlers.get(channel).delete(name);
            report.record(name, format!("{} delete", channel), result);
        }
        report.record(name, "files delete", self.handlers.files.delete(name));
        Ok(report)
    }

    /// Summaries of all projects, sorted by name.
    pub fn list_projects(&self) -> CoreResult<ProjectListing> {
        let mut report = FleetReport::new("list");
        let mut projects = Vec::new();

        for name in self.store.list_projects()? {
            let result = self.store.summary(&name);
            match result {
                Ok(summary) => projects.push(summary),
                Err(e) => {
                    report.record::<()>(&name, "read metadata", Err(e.into()));
                }
            }
        }
        Ok(ProjectListing { projects, report })
    }

    /// Names of every project in the base directory.
    pub fn all_projects(&self) -> CoreResult<Vec<String>> {
        Ok(self.store.list_projects()?)
    }

    fn index_summaries(&self) -> CoreResult<Vec<ProjectSummary>> {
        let mut summaries = Vec::new();
        for name in self.store.list_projects()? {
            match self.store.summary(&name) {
                Ok(summary) => summaries.push(summary),
                Err(e) => warn!("Leaving {} out of the site index: {}", name, e),
            }
        }
        Ok(summaries)
    }
}
