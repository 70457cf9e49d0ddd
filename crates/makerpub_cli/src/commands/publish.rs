//! Publish command - stage and publish projects on selected channels.

use anyhow::Result;
use clap::Args;
use makerpub_core::{Channel, CoreError, PublishOptions};
use tracing::info;

use super::GlobalArgs;

#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Project slugs to publish
    #[arg(long, num_args = 1.., required_unless_present = "all_projects", conflicts_with = "all_projects")]
    pub projects: Vec<String>,

    /// Publish every project in the base directory
    #[arg(long)]
    pub all_projects: bool,

    /// Channels to publish to (web, github, pdf, raw, things)
    #[arg(
        long,
        num_args = 1..,
        value_delimiter = ',',
        value_parser = parse_channel,
        required_unless_present = "all_channels",
        conflicts_with = "all_channels"
    )]
    pub channels: Vec<Channel>,

    /// Publish to github, web, pdf and raw
    #[arg(long)]
    pub all_channels: bool,

    /// Commit message for repository updates
    #[arg(short = 'm', long, default_value = "Update project content")]
    pub commit_message: String,

    /// Put images inside the main PDF instead of a separate document
    #[arg(long)]
    pub collate_images: bool,

    /// Maximum image width in the PDF, in pixels
    #[arg(long)]
    pub max_width: Option<u32>,

    /// Maximum image height in the PDF, in pixels
    #[arg(long)]
    pub max_height: Option<u32>,

    /// Prefix for PDF file names
    #[arg(long, default_value = "")]
    pub filename_prepend: String,
}

fn parse_channel(value: &str) -> Result<Channel, String> {
    value.parse().map_err(|e: CoreError| e.to_string())
}

impl PublishArgs {
    pub fn selected_channels(&self) -> Vec<Channel> {
        if self.all_channels {
            Channel::PUBLISHABLE.to_vec()
        } else {
            let mut channels = Vec::new();
            for channel in &self.channels {
                if !channels.contains(channel) {
                    channels.push(*channel);
                }
            }
            channels
        }
    }

    pub fn options(&self) -> PublishOptions {
        PublishOptions {
            commit_message: self.commit_message.clone(),
            collate_images: self.collate_images,
            filename_prepend: self.filename_prepend.clone(),
            max_width: self.max_width,
            max_height: self.max_height,
        }
    }
}

pub fn execute(global: &GlobalArgs, args: &PublishArgs) -> Result<()> {
    let automation = super::automation(global)?;

    let projects = if args.all_projects {
        automation.all_projects()?
    } else {
        args.projects.clone()
    };
    let channels = args.selected_channels();

    info!(
        "Publishing {} project(s) to {}",
        projects.len(),
        channels
            .iter()
            .map(Channel::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let report = automation.publish(&projects, &channels, &args.options());
    super::finish(&report)
}
