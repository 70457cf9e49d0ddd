//! # makerpub_core
//!
//! Publishing channels and the orchestrator that drives them.
//!
//! A maker project is published to several destinations ([`Channel`]s):
//! a GitHub repository, a Jekyll site, PDF documents, a raw file export
//! and a Things 3 to-do. Each destination is a [`ChannelHandler`];
//! [`Automation`] runs lifecycle operations (create, rename, delete,
//! publish) across them.
//!
//! External programs (`git`, `gh`, `osascript`, the PDF backend) run
//! through a [`makerpub_runner::CommandRunner`], so everything here can be
//! exercised against a mock runner.
//!
//! Fleet operations return a [`FleetReport`] with one outcome per
//! (project, step) instead of stopping at the first failure.

pub mod automation;
pub mod channels;
pub mod config;
pub mod error;
pub mod files;
pub mod git;
pub mod report;

pub use automation::{Automation, ProjectListing};
pub use channels::{Channel, ChannelHandler, GhCli, Handlers, PublishOptions};
pub use config::Config;
pub use error::{CoreError, CoreResult, FailureKind};
pub use files::{LocalFiles, ProjectFiles};
pub use git::GitOps;
pub use report::{Failure, FleetReport, Outcome};
