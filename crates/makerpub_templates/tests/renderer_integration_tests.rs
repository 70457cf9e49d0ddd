//! Integration tests for template rendering.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use makerpub_project::ProjectStore;
use makerpub_templates::{
    Context, ContextProcessor, LinkConfig, NeverPublic, TemplateError, TemplateId,
    TemplateRenderer, VisibilityCheck,
};
use serde_json::json;
use tempfile::{tempdir, TempDir};

const METADATA: &str = r#"
project:
  display_name: Prototype One
  date_created: 2024-03-09
  status: STATUS
  tagline: A kinetic wall piece
  embeds: []
physical_specifications:
  dimensions: {width: 10, height: 5, depth: 4, unit: cm}
  weight: {value: "", unit: kg}
  materials: {primary: [oak, brass], consumables: []}
technical_requirements:
  lighting: ""
  mounting: wall
  environmental: {temperature_range: "", humidity_range: "", ventilation_needs: ""}
exhibition:
  setup: {instructions: "", time_required: "", people_required: "", tools_required: []}
  maintenance: {supplies_needed: [], tasks: []}
"#;

struct AlwaysPublic;

impl VisibilityCheck for AlwaysPublic {
    fn is_public(&self, _name: &str) -> bool {
        true
    }
}

fn write_project(base: &Path, name: &str, status: &str, content: Option<&str>, readme: Option<&str>) {
    let root = base.join(name);
    fs::create_dir_all(root.join("content")).unwrap();
    fs::write(root.join("metadata.yml"), METADATA.replace("STATUS", status)).unwrap();
    if let Some(content) = content {
        fs::write(root.join("content/content.md"), content).unwrap();
    }
    if let Some(readme) = readme {
        fs::write(root.join("content/README.md"), readme).unwrap();
    }
}

fn renderer(base: &Path, templates: Option<&Path>) -> TemplateRenderer {
    let processor = ContextProcessor::new(
        ProjectStore::new(base),
        LinkConfig::new("https://maker.example", "maker"),
        Arc::new(NeverPublic),
    );
    TemplateRenderer::new(processor, templates).unwrap()
}

fn setup(status: &str, content: Option<&str>, readme: Option<&str>) -> (TempDir, TemplateRenderer) {
    let temp = tempdir().unwrap();
    write_project(temp.path(), "proto1", status, content, readme);
    let renderer = renderer(temp.path(), None);
    (temp, renderer)
}

#[test]
fn test_readme_renders_metadata_and_readme_body() {
    let (_temp, renderer) = setup(
        "complete",
        None,
        Some("Built for {{ project.display_name }} in {{ materials }}."),
    );

    let readme = renderer
        .process_template("proto1", TemplateId::GithubReadme, Context::new())
        .unwrap();

    assert!(readme.starts_with("# Prototype One"));
    assert!(readme.contains("> A kinetic wall piece"));
    assert!(readme.contains("Project page: <https://maker.example/proto1>"));
    assert!(readme.contains("Built for Prototype One in oak, brass."));
    assert!(readme.contains("- **Dimensions:** 10cm w x 5cm h x 4cm d"));
    assert!(readme.contains("- **Mounting:** wall"));
    assert!(!readme.contains("Weight"));
    assert!(!readme.contains("## Images"));
}

#[test]
fn test_nested_content_is_single_pass() {
    let (_temp, renderer) = setup("backlog", Some("Value: {{ trick }}"), None);

    let mut base = Context::new();
    base.insert("trick".into(), json!("{{ name }}"));

    let post = renderer
        .process_template("proto1", TemplateId::WebPost, base)
        .unwrap();

    assert!(post.contains("Value: {{ name }}"));
    assert!(!post.contains("Value: proto1"));
}

#[test]
fn test_content_sees_authored_project_fields() {
    let temp = tempdir().unwrap();
    write_project(
        temp.path(),
        "proto1",
        "backlog",
        Some("Slug: {{ project.name }}, for {{ project.client }}"),
        None,
    );
    let metadata = temp.path().join("proto1/metadata.yml");
    let authored = fs::read_to_string(&metadata)
        .unwrap()
        .replace("  display_name:", "  name: proto1\n  client: City Library\n  display_name:");
    fs::write(&metadata, authored).unwrap();

    let post = renderer(temp.path(), None)
        .process_template("proto1", TemplateId::WebPost, Context::new())
        .unwrap();
    assert!(post.contains("Slug: proto1, for City Library"));
}

#[test]
fn test_project_name_defaults_to_slug() {
    let (_temp, renderer) = setup("backlog", Some("Slug: {{ project.name }}"), None);

    let post = renderer
        .process_template("proto1", TemplateId::WebPost, Context::new())
        .unwrap();
    assert!(post.contains("Slug: proto1"));
}

#[test]
fn test_derived_context_wins_over_base() {
    let (_temp, renderer) = setup("complete", Some("Site: {{ website }}"), None);

    let mut base = Context::new();
    base.insert("website".into(), json!("https://elsewhere.example"));

    let post = renderer
        .process_template("proto1", TemplateId::WebPost, base)
        .unwrap();
    assert!(post.contains("Site: https://maker.example/proto1"));
}

#[test]
fn test_empty_base_values_are_dropped() {
    let (_temp, renderer) = setup("backlog", None, None);

    let mut base = Context::new();
    base.insert("images".into(), json!([]));

    let readme = renderer
        .process_template("proto1", TemplateId::GithubReadme, base)
        .unwrap();
    assert!(!readme.contains("## Images"));

    let mut base = Context::new();
    base.insert("images".into(), json!(["media/images/front.jpg"]));
    let readme = renderer
        .process_template("proto1", TemplateId::GithubReadme, base)
        .unwrap();
    assert!(readme.contains("![front.jpg](media/images/front.jpg)"));
}

#[test]
fn test_undefined_reference_in_content_fails() {
    let (_temp, renderer) = setup("backlog", Some("Broken {{ no_such_field }}"), None);

    let err = renderer
        .process_template("proto1", TemplateId::WebPost, Context::new())
        .unwrap_err();
    assert!(matches!(
        err,
        TemplateError::RenderingFailed { ref project, ref template, .. }
            if project == "proto1" && template == "content"
    ));
}

#[test]
fn test_missing_project_fails() {
    let temp = tempdir().unwrap();
    let renderer = renderer(temp.path(), None);
    assert!(matches!(
        renderer.process_template("ghost", TemplateId::WebPost, Context::new()),
        Err(TemplateError::Project(_))
    ));
}

#[test]
fn test_public_repository_link() {
    let temp = tempdir().unwrap();
    write_project(temp.path(), "proto1", "in_progress", None, None);
    let processor = ContextProcessor::new(
        ProjectStore::new(temp.path()),
        LinkConfig::new("https://maker.example", "maker"),
        Arc::new(AlwaysPublic),
    );
    let renderer = TemplateRenderer::new(processor, None).unwrap();

    let post = renderer
        .process_template("proto1", TemplateId::WebPost, Context::new())
        .unwrap();
    assert!(post.contains("[Source on GitHub](https://github.com/maker/proto1)"));
}

#[test]
fn test_template_override_directory() {
    let temp = tempdir().unwrap();
    write_project(temp.path(), "proto1", "backlog", None, None);
    let templates = temp.path().join("_templates");
    fs::create_dir_all(templates.join("github")).unwrap();
    fs::write(templates.join("github/README.md"), "custom {{ name }}").unwrap();

    let renderer = renderer(temp.path(), Some(&templates));
    let readme = renderer
        .process_template("proto1", TemplateId::GithubReadme, Context::new())
        .unwrap();
    assert_eq!(readme, "custom proto1");
}

#[test]
fn test_render_page_without_project() {
    let temp = tempdir().unwrap();
    let renderer = renderer(temp.path(), None);

    let mut context = Context::new();
    context.insert("project_count".into(), json!(3));
    context.insert("complete_count".into(), json!(1));
    context.insert("github".into(), json!("https://github.com/maker"));

    let about = renderer.render_page(TemplateId::WebAbout, &context).unwrap();
    assert!(about.contains("documents 3 maker projects, 1 of them finished."));
}
