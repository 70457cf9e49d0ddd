//! Task-tracker channel: a Things 3 to-do per project, driven through
//! `osascript`.

use std::path::PathBuf;
use std::sync::Arc;

use makerpub_project::ProjectIdentity;
use makerpub_runner::{CommandRunner, CommandSpec};
use tracing::{debug, info};

use super::{Channel, ChannelHandler, PublishOptions};
use crate::error::CoreResult;

pub struct ThingsHandler {
    enabled: bool,
    area: String,
    runner: Arc<dyn CommandRunner>,
    workdir: PathBuf,
}

impl ThingsHandler {
    pub fn new(
        enabled: bool,
        area: impl Into<String>,
        runner: Arc<dyn CommandRunner>,
        workdir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            enabled,
            area: area.into(),
            runner,
            workdir: workdir.into(),
        }
    }

    fn run_script(&self, lines: &[String]) -> CoreResult<()> {
        let mut spec = CommandSpec::new("osascript").current_dir(&self.workdir);
        for line in lines {
            spec = spec.arg("-e").arg(line);
        }
        self.runner.run_checked(&spec)?;
        Ok(())
    }
}

/// Quote a value as an AppleScript string literal.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

impl ChannelHandler for ThingsHandler {
    fn channel(&self) -> Channel {
        Channel::Things
    }

    fn init(&self, project: &ProjectIdentity) -> CoreResult<()> {
        if !self.enabled {
            debug!("Things integration disabled, not creating a to-do for {}", project.name);
            return Ok(());
        }
        self.run_script(&[
            "tell application \"Things3\"".to_string(),
            format!(
                "make new to do with properties {{name:{}}} at beginning of area {}",
                quote(&project.display_name),
                quote(&self.area)
            ),
            "end tell".to_string(),
        ])?;
        info!("Created Things to-do for {} in {}", project.display_name, self.area);
        Ok(())
    }

    fn stage(&self, _name: &str, _options: &PublishOptions) -> CoreResult<()> {
        Ok(())
    }

    fn publish(&self, _name: &str, _options: &PublishOptions) -> CoreResult<()> {
        Ok(())
    }

    fn rename(&self, from: &ProjectIdentity, to: &ProjectIdentity) -> CoreResult<()> {
        if !self.enabled {
            debug!("Things integration disabled, not renaming {}", from.name);
            return Ok(());
        }
        if from.display_name == to.display_name {
            return Ok(());
        }
        self.run_script(&[
            "tell application \"Things3\"".to_string(),
            format!(
                "set name of to do named {} to {}",
                quote(&from.display_name),
                quote(&to.display_name)
            ),
            "end tell".to_string(),
        ])?;
        info!("Renamed Things to-do {} -> {}", from.display_name, to.display_name);
        Ok(())
    }

    fn delete(&self, name: &str) -> CoreResult<()> {
        debug!("Leaving Things to-do for {} in place", name);
        Ok(())
    }
}
