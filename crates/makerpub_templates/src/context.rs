//! Metadata-to-context processing.
//!
//! A [`Context`] is the flat mapping handed to templates. It is rebuilt on
//! every render from a fresh metadata read and never stored.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{error, info};

use makerpub_project::{is_truthy, display_value, ProjectMetadata, ProjectStore, Status};

use crate::error::{TemplateError, TemplateResult};

/// Flat template context: field name to string, list or object.
pub type Context = BTreeMap<String, Value>;

/// Answers whether a project's source repository is publicly visible.
#[cfg_attr(test, mockall::automock)]
pub trait VisibilityCheck {
    fn is_public(&self, name: &str) -> bool;
}

/// Visibility check for setups without a source host: nothing is public.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverPublic;

impl VisibilityCheck for NeverPublic {
    fn is_public(&self, _name: &str) -> bool {
        false
    }
}

/// Where public links point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    pub website_domain: String,
    pub github_username: String,
}

impl LinkConfig {
    pub fn new(website_domain: impl Into<String>, github_username: impl Into<String>) -> Self {
        Self {
            website_domain: website_domain.into(),
            github_username: github_username.into(),
        }
    }

    /// Profile URL on the source host.
    pub fn github_url(&self) -> String {
        format!("https://github.com/{}", self.github_username)
    }

    pub fn project_website(&self, name: &str) -> String {
        format!("{}/{}", self.website_domain, name)
    }

    pub fn project_github(&self, name: &str) -> String {
        format!("{}/{}", self.github_url(), name)
    }
}

/// Builds template contexts from project metadata.
pub struct ContextProcessor {
    store: ProjectStore,
    links: LinkConfig,
    visibility: Arc<dyn VisibilityCheck>,
}

impl ContextProcessor {
    pub fn new(store: ProjectStore, links: LinkConfig, visibility: Arc<dyn VisibilityCheck>) -> Self {
        Self {
            store,
            links,
            visibility,
        }
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn links(&self) -> &LinkConfig {
        &self.links
    }

    /// Read the project's metadata and flatten it into a context.
    pub fn process_project_metadata(&self, name: &str) -> TemplateResult<Context> {
        let result = self
            .store
            .read_metadata(name)
            .map_err(TemplateError::from)
            .and_then(|metadata| {
                let public = self.visibility.is_public(name);
                build_context(name, &metadata, &self.links, public)
            });

        match &result {
            Ok(_) => info!("Processed metadata for {}", name),
            Err(e) => error!("Failed to process metadata for {}: {}", name, e),
        }
        result
    }
}

/// Flatten a metadata record into a context. Pure: same input, same output.
pub fn build_context(
    name: &str,
    metadata: &ProjectMetadata,
    links: &LinkConfig,
    repository_public: bool,
) -> TemplateResult<Context> {
    let mut ctx = Context::new();
    let mut project = serde_json::to_value(&metadata.project)?;
    if metadata.project.name.is_none() {
        project["name"] = json!(name);
    }

    ctx.insert("name".into(), json!(name));
    ctx.insert("website".into(), json!(links.website_domain));
    ctx.insert("github".into(), json!(links.github_url()));
    ctx.insert("github_username".into(), json!(links.github_username));

    if metadata.project.status == Status::Complete {
        let url = links.project_website(name);
        project["website"] = json!(url);
        ctx.insert("website".into(), json!(url));
    }
    if repository_public {
        let url = links.project_github(name);
        project["github"] = json!(url);
        ctx.insert("github".into(), json!(url));
    }

    let embeds = &metadata.project.embeds;
    if !embeds.is_empty() {
        let of_kind = |kind: &str| -> Vec<Value> {
            embeds
                .iter()
                .filter(|embed| embed.is_kind(kind))
                .map(|embed| json!(embed))
                .collect()
        };
        ctx.insert("iframe_embeds".into(), Value::Array(of_kind("iframe")));
        ctx.insert("github_embeds".into(), Value::Array(of_kind("github")));
    }

    ctx.insert("project".into(), project);

    let specs = &metadata.physical_specifications;
    let dims = &specs.dimensions;
    if is_truthy(&dims.width) && is_truthy(&dims.height) && is_truthy(&dims.depth) {
        let unit = &dims.unit;
        ctx.insert(
            "dimensions".into(),
            json!(format!(
                "{}{unit} w x {}{unit} h x {}{unit} d",
                display_value(&dims.width),
                display_value(&dims.height),
                display_value(&dims.depth),
            )),
        );
    }
    if is_truthy(&specs.weight.value) {
        ctx.insert(
            "weight".into(),
            json!(format!("{} {}", display_value(&specs.weight.value), specs.weight.unit)),
        );
    }
    insert_joined(&mut ctx, "materials", &specs.materials.primary);
    insert_joined(&mut ctx, "consumables", &specs.materials.consumables);

    let reqs = &metadata.technical_requirements;
    insert_truthy(&mut ctx, "lighting", &reqs.lighting);
    insert_truthy(&mut ctx, "mounting", &reqs.mounting);
    insert_truthy(&mut ctx, "temperature_range", &reqs.environmental.temperature_range);
    insert_truthy(&mut ctx, "humidity_range", &reqs.environmental.humidity_range);
    insert_truthy(&mut ctx, "ventilation_needs", &reqs.environmental.ventilation_needs);

    let setup = &metadata.exhibition.setup;
    insert_truthy(&mut ctx, "setup_instructions", &setup.instructions);
    insert_truthy(&mut ctx, "setup_time", &setup.time_required);
    insert_truthy(&mut ctx, "setup_people", &setup.people_required);
    insert_joined(&mut ctx, "setup_tools", &setup.tools_required);

    let maintenance = &metadata.exhibition.maintenance;
    insert_joined(&mut ctx, "maintenance_supplies", &maintenance.supplies_needed);
    insert_truthy(&mut ctx, "maintenance_instructions", &maintenance.tasks);

    Ok(ctx)
}

/// Drop entries a template should treat as absent: `[]`, `""` and null.
pub fn clean_context(context: Context) -> Context {
    context
        .into_iter()
        .filter(|(_, value)| match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            _ => true,
        })
        .collect()
}

fn insert_truthy(ctx: &mut Context, key: &str, value: &Value) {
    if is_truthy(value) {
        ctx.insert(key.to_string(), value.clone());
    }
}

fn insert_joined(ctx: &mut Context, key: &str, items: &[String]) {
    if !items.is_empty() {
        ctx.insert(key.to_string(), json!(items.join(", ")));
    }
}
