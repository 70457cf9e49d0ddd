//! Local project directory operations used by the orchestrator.

use chrono::NaiveDate;
use makerpub_project::{ProjectIdentity, ProjectStore};

use crate::error::CoreResult;

/// Creates, renames and deletes project directories.
pub trait ProjectFiles {
    fn create(&self, project: &ProjectIdentity, date_created: NaiveDate) -> CoreResult<()>;
    fn rename(&self, from: &ProjectIdentity, to: &ProjectIdentity) -> CoreResult<()>;
    fn delete(&self, name: &str) -> CoreResult<()>;
}

/// [`ProjectFiles`] backed by the project store on disk.
#[derive(Debug, Clone)]
pub struct LocalFiles {
    store: ProjectStore,
}

impl LocalFiles {
    pub fn new(store: ProjectStore) -> Self {
        Self { store }
    }
}

impl ProjectFiles for LocalFiles {
    fn create(&self, project: &ProjectIdentity, date_created: NaiveDate) -> CoreResult<()> {
        self.store.create(project, date_created)?;
        Ok(())
    }

    fn rename(&self, from: &ProjectIdentity, to: &ProjectIdentity) -> CoreResult<()> {
        self.store.rename(from, to)?;
        Ok(())
    }

    fn delete(&self, name: &str) -> CoreResult<()> {
        self.store.delete(name)?;
        Ok(())
    }
}
