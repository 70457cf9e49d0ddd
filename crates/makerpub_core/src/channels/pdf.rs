//! PDF channel: an HTML document per project, converted by an external
//! backend such as `weasyprint`.

use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use makerpub_project::{MediaType, ProjectIdentity, ProjectStore};
use makerpub_runner::{CommandRunner, CommandSpec};
use makerpub_templates::{Context, TemplateId, TemplateRenderer};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use super::{Channel, ChannelHandler, PublishOptions};
use crate::config::Config;
use crate::error::{CoreError, CoreResult};

const STYLESHEET: &str = "style.css";
const IMAGES_SUFFIX: &str = "_images";

/// Hidden directory under the PDF dir holding one record per project.
const PRODUCED_DIR: &str = ".produced";

/// Files written for one project, named `<prefix><name><ending>`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Produced {
    prefix: String,
    files: Vec<String>,
}

/// Renders project documents and converts them to PDF.
pub struct PdfHandler {
    config: Rc<Config>,
    store: ProjectStore,
    renderer: Rc<TemplateRenderer>,
    runner: Arc<dyn CommandRunner>,
}

impl PdfHandler {
    pub fn new(
        config: Rc<Config>,
        store: ProjectStore,
        renderer: Rc<TemplateRenderer>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            config,
            store,
            renderer,
            runner,
        }
    }

    pub fn document_path(&self, name: &str, options: &PublishOptions) -> PathBuf {
        self.config
            .pdf_dir()
            .join(format!("{}{}.html", options.filename_prepend, name))
    }

    pub fn images_document_path(&self, name: &str, options: &PublishOptions) -> PathBuf {
        self.config.pdf_dir().join(format!(
            "{}{}{}.html",
            options.filename_prepend, name, IMAGES_SUFFIX
        ))
    }

    /// Write the HTML documents for a project and return their paths.
    fn render_documents(&self, name: &str, options: &PublishOptions) -> CoreResult<Vec<PathBuf>> {
        let metadata = self.store.read_metadata(name)?;
        let dir = self.config.pdf_dir();
        fs::create_dir_all(&dir)?;

        let style = self
            .renderer
            .render_page(TemplateId::PdfStyle, &Context::new())?;
        fs::write(dir.join(STYLESHEET), style)?;

        let mut cover = Context::new();
        cover.insert("display_name".into(), json!(metadata.project.display_name));
        cover.insert(
            "date_created".into(),
            json!(metadata.project.date_created.to_string()),
        );
        if let Some(tagline) = metadata.project.tagline.as_deref().filter(|t| !t.is_empty()) {
            cover.insert("tagline".into(), json!(tagline));
        }
        let cover = self.renderer.render_page(TemplateId::PdfCover, &cover)?;

        let images: Vec<String> = self
            .store
            .media_files(name, MediaType::Images)?
            .iter()
            .map(|path| path.to_string_lossy().into_owned())
            .collect();
        let mut gallery = Context::new();
        gallery.insert("images".into(), json!(images));
        if let Some(width) = options.max_width {
            gallery.insert("max_width".into(), json!(width));
        }
        if let Some(height) = options.max_height {
            gallery.insert("max_height".into(), json!(height));
        }

        let mut base = Context::new();
        base.insert("cover".into(), json!(cover));
        base.insert("stylesheet".into(), json!(STYLESHEET));
        if options.collate_images && !images.is_empty() {
            let page = self
                .renderer
                .process_template(name, TemplateId::PdfImages, gallery.clone())?;
            base.insert("images_page".into(), json!(page));
        }

        let main = self.document_path(name, options);
        let html = self
            .renderer
            .process_template(name, TemplateId::PdfProject, base)?;
        fs::write(&main, html)?;
        let mut documents = vec![main];

        let separate = self.images_document_path(name, options);
        if !options.collate_images && !images.is_empty() {
            let page = self
                .renderer
                .process_template(name, TemplateId::PdfImages, gallery)?;
            fs::write(&separate, standalone(&metadata.project.display_name, &page))?;
            documents.push(separate);
        } else {
            for stale in [separate.clone(), separate.with_extension("pdf")] {
                if stale.exists() {
                    fs::remove_file(&stale)?;
                }
            }
        }

        self.record_produced(name, &options.filename_prepend, &documents)?;
        debug!("Rendered {} PDF document(s) for {}", documents.len(), name);
        Ok(documents)
    }

    /// Split `pdf_command` into the program and its leading arguments.
    fn backend(&self) -> CoreResult<CommandSpec> {
        let mut parts = self.config.pdf_command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| CoreError::Config("pdf_command is empty".into()))?;
        Ok(CommandSpec::new(program).args(parts).current_dir(self.config.pdf_dir()))
    }

    fn produced_path(&self, name: &str) -> PathBuf {
        self.config
            .pdf_dir()
            .join(PRODUCED_DIR)
            .join(format!("{}.json", name))
    }

    fn load_produced(&self, name: &str) -> CoreResult<Option<Produced>> {
        let path = self.produced_path(name);
        if !path.is_file() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save_produced(&self, name: &str, produced: &Produced) -> CoreResult<()> {
        let path = self.produced_path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(produced)?)?;
        Ok(())
    }

    /// Add `paths` to the project's record. Files written under a different
    /// prefix earlier are removed first.
    fn record_produced(&self, name: &str, prefix: &str, paths: &[PathBuf]) -> CoreResult<()> {
        let dir = self.config.pdf_dir();
        let mut produced = match self.load_produced(name)? {
            Some(previous) if previous.prefix == prefix => previous,
            Some(previous) => {
                for file in &previous.files {
                    let old = dir.join(file);
                    if old.is_file() {
                        fs::remove_file(&old)?;
                        debug!("Removed {:?} written under prefix '{}'", old, previous.prefix);
                    }
                }
                Produced::default()
            }
            None => Produced::default(),
        };
        produced.prefix = prefix.to_string();

        let fresh: Vec<String> = paths
            .iter()
            .filter_map(|p| p.file_name().and_then(|f| f.to_str()).map(str::to_owned))
            .collect();
        produced
            .files
            .retain(|file| fresh.contains(file) || dir.join(file).is_file());
        for file in fresh {
            if !produced.files.contains(&file) {
                produced.files.push(file);
            }
        }
        produced.files.sort();
        self.save_produced(name, &produced)
    }
}

fn standalone(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n  \
         <title>{} images</title>\n  <link rel=\"stylesheet\" href=\"{}\">\n</head>\n\
         <body>\n{}</body>\n</html>\n",
        title, STYLESHEET, body
    )
}

impl ChannelHandler for PdfHandler {
    fn channel(&self) -> Channel {
        Channel::Pdf
    }

    fn stage(&self, name: &str, options: &PublishOptions) -> CoreResult<()> {
        self.render_documents(name, options)?;
        Ok(())
    }

    fn publish(&self, name: &str, options: &PublishOptions) -> CoreResult<()> {
        let mut generated = Vec::new();
        for html in self.render_documents(name, options)? {
            let pdf = html.with_extension("pdf");
            let spec = self
                .backend()?
                .arg(html.to_string_lossy())
                .arg(pdf.to_string_lossy());
            self.runner.run_checked(&spec)?;
            info!("Generated {:?}", pdf);
            generated.push(pdf);
        }
        self.record_produced(name, &options.filename_prepend, &generated)
    }

    fn rename(&self, from: &ProjectIdentity, to: &ProjectIdentity) -> CoreResult<()> {
        let Some(produced) = self.load_produced(&from.name)? else {
            debug!("No PDF documents recorded for {}", from.name);
            return Ok(());
        };
        let dir = self.config.pdf_dir();
        let old_stem = format!("{}{}", produced.prefix, from.name);
        let new_stem = format!("{}{}", produced.prefix, to.name);

        let mut moved = Produced {
            prefix: produced.prefix.clone(),
            files: Vec::with_capacity(produced.files.len()),
        };
        for file in &produced.files {
            let Some(ending) = file.strip_prefix(&old_stem) else {
                continue;
            };
            let target = format!("{}{}", new_stem, ending);
            let path = dir.join(file);
            if path.is_file() {
                fs::rename(&path, dir.join(&target))?;
                debug!("Moved {:?} -> {}", path, target);
            }
            moved.files.push(target);
        }
        fs::remove_file(self.produced_path(&from.name))?;
        self.save_produced(&to.name, &moved)
    }

    fn delete(&self, name: &str) -> CoreResult<()> {
        let Some(produced) = self.load_produced(name)? else {
            debug!("No PDF documents recorded for {}", name);
            return Ok(());
        };
        let dir = self.config.pdf_dir();
        for file in &produced.files {
            let path = dir.join(file);
            if path.is_file() {
                fs::remove_file(&path)?;
                debug!("Removed {:?}", path);
            }
        }
        fs::remove_file(self.produced_path(name))?;
        info!("Removed PDF documents for {}", name);
        Ok(())
    }
}
