//! Raw export channel: copies a project's authored files into
//! `<base>/_output/<name>`.

use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use makerpub_project::layout::{CONTENT_FILE, README_FILE};
use makerpub_project::{ProjectIdentity, ProjectStore};
use tracing::{debug, info, warn};

use super::{replace_existing, Channel, ChannelHandler, PublishOptions};
use crate::config::Config;
use crate::error::CoreResult;

pub struct RawHandler {
    config: Rc<Config>,
    store: ProjectStore,
}

impl RawHandler {
    pub fn new(config: Rc<Config>, store: ProjectStore) -> Self {
        Self { config, store }
    }

    pub fn output_path(&self, name: &str) -> PathBuf {
        self.config.output_dir().join(name)
    }
}

impl ChannelHandler for RawHandler {
    fn channel(&self) -> Channel {
        Channel::Raw
    }

    fn stage(&self, name: &str, _options: &PublishOptions) -> CoreResult<()> {
        self.store.require(name)?;
        debug!("Raw export of {} is written on publish", name);
        Ok(())
    }

    fn publish(&self, name: &str, _options: &PublishOptions) -> CoreResult<()> {
        self.store.require(name)?;
        let target = self.output_path(name);
        if target.exists() {
            fs::remove_dir_all(&target)?;
        }
        fs::create_dir_all(&target)?;

        let sources = [
            (self.store.readme_source_path(name), README_FILE),
            (self.store.content_path(name), CONTENT_FILE),
        ];
        for (source, file) in sources {
            if source.is_file() {
                fs::copy(&source, target.join(file))?;
            } else {
                warn!("{} has no {}, skipping", name, file);
            }
        }

        let media = self.store.all_media_files(name)?;
        if !media.is_empty() {
            fs_extra::copy_items(&media, &target, &replace_existing())?;
        }

        info!("Exported {} with {} media files to {:?}", name, media.len(), target);
        Ok(())
    }

    fn rename(&self, from: &ProjectIdentity, to: &ProjectIdentity) -> CoreResult<()> {
        let source = self.output_path(&from.name);
        if source.is_dir() {
            fs::rename(&source, self.output_path(&to.name))?;
        }
        Ok(())
    }

    fn delete(&self, name: &str) -> CoreResult<()> {
        let target = self.output_path(name);
        if target.is_dir() {
            fs::remove_dir_all(&target)?;
            info!("Removed raw export of {}", name);
        }
        Ok(())
    }
}
