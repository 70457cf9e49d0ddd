//! Integration tests for the orchestrator.

use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use chrono::NaiveDate;
use makerpub_core::{
    Automation, Channel, ChannelHandler, Config, CoreError, CoreResult, FailureKind, Handlers,
    ProjectFiles, PublishOptions,
};
use makerpub_project::{ProjectIdentity, ProjectStore, ProjectSummary};
use makerpub_runner::MockRunner;
use tempfile::tempdir;

type Log = Rc<RefCell<Vec<String>>>;

/// Records every call; fails the operation named `fail_op`, optionally only
/// for one project.
struct Recorder {
    channel: Channel,
    log: Log,
    fail_op: Option<&'static str>,
    fail_project: Option<&'static str>,
}

impl Recorder {
    fn note(&self, op: &str, subject: &str) -> CoreResult<()> {
        self.log
            .borrow_mut()
            .push(format!("{} {} {}", self.channel, op, subject));
        let project_matches = self.fail_project.map_or(true, |p| p == subject);
        if self.fail_op == Some(op) && project_matches {
            return Err(CoreError::InvalidInput(format!("{} refused {}", self.channel, op)));
        }
        Ok(())
    }
}

impl ChannelHandler for Recorder {
    fn channel(&self) -> Channel {
        self.channel
    }

    fn init(&self, project: &ProjectIdentity) -> CoreResult<()> {
        self.note("init", &project.name)
    }

    fn stage(&self, name: &str, _options: &PublishOptions) -> CoreResult<()> {
        self.note("stage", name)
    }

    fn publish(&self, name: &str, _options: &PublishOptions) -> CoreResult<()> {
        self.note("publish", name)
    }

    fn stage_index(&self, projects: &[ProjectSummary]) -> CoreResult<()> {
        self.note("stage_index", &projects.len().to_string())
    }

    fn publish_index(&self, _options: &PublishOptions) -> CoreResult<()> {
        self.note("publish_index", "site")
    }

    fn rename(&self, from: &ProjectIdentity, to: &ProjectIdentity) -> CoreResult<()> {
        self.note("rename", &format!("{}->{}", from.name, to.name))
    }

    fn delete(&self, name: &str) -> CoreResult<()> {
        self.note("delete", name)
    }
}

struct RecordingFiles {
    log: Log,
    fail: bool,
}

impl RecordingFiles {
    fn note(&self, entry: String) -> CoreResult<()> {
        self.log.borrow_mut().push(entry);
        if self.fail {
            return Err(CoreError::InvalidInput("files refused".into()));
        }
        Ok(())
    }
}

impl ProjectFiles for RecordingFiles {
    fn create(&self, project: &ProjectIdentity, _date_created: NaiveDate) -> CoreResult<()> {
        self.note(format!("files create {}", project.name))
    }

    fn rename(&self, from: &ProjectIdentity, to: &ProjectIdentity) -> CoreResult<()> {
        self.note(format!("files rename {}->{}", from.name, to.name))
    }

    fn delete(&self, name: &str) -> CoreResult<()> {
        self.note(format!("files delete {}", name))
    }
}

#[derive(Default)]
struct Failures {
    channel: Option<(Channel, &'static str, Option<&'static str>)>,
    files: bool,
}

fn automation(base: &Path, failures: Failures) -> (Automation, Log) {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let handler = |channel: Channel| -> Box<dyn ChannelHandler> {
        let (fail_op, fail_project) = match failures.channel {
            Some((c, op, project)) if c == channel => (Some(op), project),
            _ => (None, None),
        };
        Box::new(Recorder {
            channel,
            log: log.clone(),
            fail_op,
            fail_project,
        })
    };
    let handlers = Handlers {
        files: Box::new(RecordingFiles {
            log: log.clone(),
            fail: failures.files,
        }),
        web: handler(Channel::Web),
        github: handler(Channel::Github),
        pdf: handler(Channel::Pdf),
        raw: handler(Channel::Raw),
        things: handler(Channel::Things),
    };
    (Automation::with_handlers(ProjectStore::new(base), handlers), log)
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
}

fn create(base: &Path, name: &str, display_name: &str) {
    ProjectStore::new(base)
        .create(&ProjectIdentity::new(name, display_name), date())
        .unwrap();
}

fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

#[test]
fn test_rename_runs_steps_in_order() {
    let temp = tempdir().unwrap();
    create(temp.path(), "proto1", "Prototype One");
    let (automation, log) = automation(temp.path(), Failures::default());

    let report = automation
        .rename_project(
            "proto1",
            &ProjectIdentity::new("proto2", "Prototype Two"),
            &PublishOptions::default(),
        )
        .unwrap();

    assert!(report.is_success());
    assert_eq!(
        entries(&log)[..6],
        [
            "things rename proto1->proto2",
            "files rename proto1->proto2",
            "web rename proto1->proto2",
            "github rename proto1->proto2",
            "pdf rename proto1->proto2",
            "raw rename proto1->proto2",
        ]
    );
    assert_eq!(entries(&log)[6], "github stage proto2");
}

#[test]
fn test_rename_does_not_short_circuit() {
    let temp = tempdir().unwrap();
    create(temp.path(), "proto1", "Prototype One");
    let (automation, log) = automation(
        temp.path(),
        Failures {
            channel: Some((Channel::Web, "rename", None)),
            files: true,
        },
    );

    let report = automation
        .rename_project(
            "proto1",
            &ProjectIdentity::new("proto2", "Prototype Two"),
            &PublishOptions::default(),
        )
        .unwrap();

    let log = entries(&log);
    assert!(log.contains(&"github rename proto1->proto2".to_string()));
    assert!(log.contains(&"pdf rename proto1->proto2".to_string()));
    assert_eq!(report.failed(), 2);
    let failed: Vec<&str> = report.failures().map(|o| o.step.as_str()).collect();
    assert_eq!(failed, vec!["files rename", "web rename"]);
}

#[test]
fn test_rename_preconditions() {
    let temp = tempdir().unwrap();
    create(temp.path(), "proto1", "Prototype One");
    create(temp.path(), "proto2", "Prototype Two");
    let (automation, log) = automation(temp.path(), Failures::default());
    let options = PublishOptions::default();

    let missing = automation
        .rename_project("ghost", &ProjectIdentity::new("proto3", "Three"), &options)
        .unwrap_err();
    assert_eq!(missing.kind(), FailureKind::NotFound);

    let taken = automation
        .rename_project("proto1", &ProjectIdentity::new("proto2", "Two"), &options)
        .unwrap_err();
    assert_eq!(taken.kind(), FailureKind::InvalidInput);

    let invalid = automation
        .rename_project("proto1", &ProjectIdentity::new("Proto 3", "Three"), &options)
        .unwrap_err();
    assert_eq!(invalid.kind(), FailureKind::InvalidInput);

    assert!(entries(&log).is_empty());
}

#[test]
fn test_publish_is_best_effort() {
    let temp = tempdir().unwrap();
    create(temp.path(), "proto1", "Prototype One");
    create(temp.path(), "proto2", "Prototype Two");
    let (automation, log) = automation(
        temp.path(),
        Failures {
            channel: Some((Channel::Web, "stage", Some("proto1"))),
            files: false,
        },
    );

    let report = automation.publish(
        &["proto1".to_string(), "proto2".to_string()],
        &[Channel::Web, Channel::Pdf],
        &PublishOptions::default(),
    );

    assert_eq!(
        entries(&log),
        vec![
            "web stage proto1",
            "pdf stage proto1",
            "web stage proto2",
            "pdf stage proto2",
            "pdf publish proto1",
            "web publish proto2",
            "pdf publish proto2",
            "web stage_index 2",
            "web publish_index site",
            "pdf stage_index 2",
            "pdf publish_index site",
        ]
    );
    assert_eq!(report.failed(), 1);
    assert_eq!(report.succeeded(), 10);
    assert_eq!(report.dominant_failure(), Some(FailureKind::InvalidInput));
}

#[test]
fn test_publish_project_stops_at_first_failure() {
    let temp = tempdir().unwrap();
    create(temp.path(), "proto1", "Prototype One");
    let (automation, log) = automation(
        temp.path(),
        Failures {
            channel: Some((Channel::Web, "stage", None)),
            files: false,
        },
    );

    assert!(automation
        .publish_project("proto1", &PublishOptions::default())
        .is_err());
    assert_eq!(entries(&log), vec!["github stage proto1", "web stage proto1"]);
}

#[test]
fn test_create_sequence() {
    let temp = tempdir().unwrap();
    let (automation, log) = automation(temp.path(), Failures::default());

    automation
        .create_project(&ProjectIdentity::new("proto1", "Prototype One"), date())
        .unwrap();

    assert_eq!(
        entries(&log)[..5],
        [
            "files create proto1",
            "github init proto1",
            "things init proto1",
            "github stage proto1",
            "web stage proto1",
        ]
    );
}

#[test]
fn test_create_propagates_init_failure() {
    let temp = tempdir().unwrap();
    let (automation, log) = automation(
        temp.path(),
        Failures {
            channel: Some((Channel::Github, "init", None)),
            files: false,
        },
    );

    let err = automation
        .create_project(&ProjectIdentity::new("proto1", "Prototype One"), date())
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::InvalidInput);
    assert_eq!(entries(&log), vec!["files create proto1", "github init proto1"]);
}

#[test]
fn test_delete_removes_everywhere() {
    let temp = tempdir().unwrap();
    create(temp.path(), "proto1", "Prototype One");
    let (automation, log) = automation(
        temp.path(),
        Failures {
            channel: Some((Channel::Github, "delete", None)),
            files: false,
        },
    );

    let report = automation.delete_project("proto1").unwrap();

    assert_eq!(
        entries(&log),
        vec![
            "github delete proto1",
            "web delete proto1",
            "pdf delete proto1",
            "raw delete proto1",
            "things delete proto1",
            "files delete proto1",
        ]
    );
    assert_eq!(report.failed(), 1);

    let missing = automation.delete_project("ghost").unwrap_err();
    assert_eq!(missing.kind(), FailureKind::NotFound);
}

#[test]
fn test_list_reports_unreadable_projects() {
    let temp = tempdir().unwrap();
    create(temp.path(), "proto2", "Prototype Two");
    create(temp.path(), "proto1", "Prototype One");
    let broken = temp.path().join("broken");
    fs::create_dir_all(&broken).unwrap();
    fs::write(broken.join("metadata.yml"), "project: [unclosed").unwrap();
    let (automation, _log) = automation(temp.path(), Failures::default());

    let listing = automation.list_projects().unwrap();

    let names: Vec<&str> = listing.projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["proto1", "proto2"]);
    assert_eq!(listing.report.failed(), 1);
    assert_eq!(listing.report.dominant_failure(), Some(FailureKind::Structural));
}

#[test]
fn test_create_with_real_handlers() {
    let temp = tempdir().unwrap();
    let base = temp.path().join("projects");
    let site = temp.path().join("site");
    fs::create_dir_all(&base).unwrap();
    fs::create_dir_all(site.join(".git")).unwrap();
    let mock = MockRunner::new();
    let config = Config::new(&base, "https://maker.example", "maker", &site);
    let automation = Automation::new(config, Arc::new(mock.clone())).unwrap();

    automation
        .create_project(&ProjectIdentity::new("proto1", "Prototype One"), date())
        .unwrap();

    assert!(base.join("proto1/README.md").is_file());
    assert!(site.join("_posts/2024-03-09-proto1.md").is_file());
    assert!(site.join("_pages/about.md").is_file());
    assert!(!site.join("_pages/roadmap.md").exists());
    assert!(base.join("_pdf/proto1.html").is_file());
    assert!(mock.was_called("gh repo create proto1 --private --source=."));
    assert!(mock.was_called("weasyprint"));
    assert!(!mock.was_called("osascript"));

    let listing = automation.list_projects().unwrap();
    assert_eq!(listing.projects.len(), 1);
}
