//! Template rendering.

use std::path::Path;

use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior};
use pulldown_cmark::{html, Options, Parser};
use serde_json::json;
use tracing::{debug, error};

use crate::context::{clean_context, Context, ContextProcessor};
use crate::error::{TemplateError, TemplateResult};
use crate::templates::{catalogue, TemplateId};

/// Renders named templates against project contexts.
pub struct TemplateRenderer {
    env: Environment<'static>,
    processor: ContextProcessor,
}

impl TemplateRenderer {
    /// Create a renderer with the built-in templates, each one replaceable by
    /// a file of the same relative path under `templates_dir`.
    pub fn new(processor: ContextProcessor, templates_dir: Option<&Path>) -> TemplateResult<Self> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        // Markdown and pre-assembled HTML fragments pass through unescaped
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_filter("basename", basename);
        env.add_filter("markdown", markdown);

        for (name, source) in catalogue(templates_dir)? {
            env.add_template_owned(name.clone(), source)
                .map_err(|source| TemplateError::InvalidTemplate {
                    template: name,
                    source,
                })?;
        }

        Ok(Self { env, processor })
    }

    pub fn processor(&self) -> &ContextProcessor {
        &self.processor
    }

    /// Render a project template.
    ///
    /// `base` is merged with the project's derived context (derived keys
    /// win), empty values are dropped, and the project's content and readme
    /// bodies are rendered once against the result before the named template
    /// sees it.
    pub fn process_template(
        &self,
        name: &str,
        template: TemplateId,
        base: Context,
    ) -> TemplateResult<String> {
        let result = self.render_project(name, template, base);
        if let Err(e) = &result {
            error!("Failed to process template {} for {}: {}", template, name, e);
        }
        result
    }

    /// Render a template that does not belong to a single project.
    pub fn render_page(&self, template: TemplateId, context: &Context) -> TemplateResult<String> {
        let result = self.render_named("site", template, context);
        if let Err(e) = &result {
            error!("Failed to render page {}: {}", template, e);
        }
        result
    }

    fn render_project(
        &self,
        name: &str,
        template: TemplateId,
        base: Context,
    ) -> TemplateResult<String> {
        let mut merged = base;
        merged.extend(self.processor.process_project_metadata(name)?);
        let mut context = clean_context(merged);

        let store = self.processor.store();
        let content = match store.read_content(name)? {
            Some(body) if !body.trim().is_empty() => {
                Some(self.render_nested(name, "content", &body, &context)?)
            }
            _ => None,
        };
        let readme = match store.read_readme(name)? {
            Some(body) if !body.trim().is_empty() => {
                Some(self.render_nested(name, "readme", &body, &context)?)
            }
            _ => None,
        };
        if let Some(content) = content {
            context.insert("content".into(), json!(content));
        }
        if let Some(readme) = readme {
            context.insert("readme".into(), json!(readme));
        }

        self.render_named(name, template, &context)
    }

    /// Render an author-written body as a template. Its output is inserted
    /// as plain text and never rendered again.
    fn render_nested(
        &self,
        name: &str,
        field: &str,
        body: &str,
        context: &Context,
    ) -> TemplateResult<String> {
        debug!("Rendering nested {} for {}", field, name);
        self.env
            .render_str(body, context)
            .map_err(|source| TemplateError::RenderingFailed {
                project: name.to_string(),
                template: field.to_string(),
                source,
            })
    }

    fn render_named(
        &self,
        name: &str,
        template: TemplateId,
        context: &Context,
    ) -> TemplateResult<String> {
        let compiled = self.env.get_template(template.path()).map_err(|e| {
            if e.kind() == ErrorKind::TemplateNotFound {
                TemplateError::NotFound(template.path().to_string())
            } else {
                TemplateError::InvalidTemplate {
                    template: template.path().to_string(),
                    source: e,
                }
            }
        })?;

        compiled
            .render(context)
            .map_err(|source| TemplateError::RenderingFailed {
                project: name.to_string(),
                template: template.path().to_string(),
                source,
            })
    }
}

fn basename(path: String) -> String {
    let file_name = Path::new(&path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    file_name.unwrap_or(path)
}

fn markdown(source: String) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(&source, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename_filter() {
        assert_eq!(basename("media/images/front.jpg".into()), "front.jpg");
        assert_eq!(basename("front.jpg".into()), "front.jpg");
    }

    #[test]
    fn test_markdown_filter() {
        let html = markdown("# Title\n\nSome *text*.".into());
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>text</em>"));
    }
}
