//! Rendering a whole [`Storage`] for the generation pipeline.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::annotation::{self, GeneratedAnnotation};
use crate::config::RenderConfig;
use crate::entity::{File, Storage};
use crate::error::Result;
use crate::render::EntityRenderer;
use crate::syntax::SyntaxService;
use crate::validate::EntityValidator;

/// One output file. Writing it out is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// `namespace.path` joined with `file.name`
    pub path: PathBuf,
    pub package: String,
    pub text: String,
}

pub struct Renderer<'s> {
    config: RenderConfig,
    syntax: &'s dyn SyntaxService,
}

impl<'s> Renderer<'s> {
    pub fn new(config: RenderConfig, syntax: &'s dyn SyntaxService) -> Self {
        Self { config, syntax }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Renders every file of every namespace, in order.
    ///
    /// Files are stamped with [`GeneratedAnnotation`] in place when
    /// `mark_generated` is set, so `storage` is borrowed mutably.
    pub fn render(&self, storage: &mut Storage) -> Result<Vec<RenderedFile>> {
        if self.config.validate {
            EntityValidator::new(self.syntax).validate(storage)?;
        }

        let renderer = EntityRenderer::new(self.syntax);
        let mut out = Vec::new();
        for ns in &mut storage.namespaces {
            if ns.is_ignored && self.config.skip_ignored {
                debug!(namespace = %ns.name, "namespace skipped (ignored)");
                continue;
            }
            for file in &mut ns.files {
                if self.config.mark_generated {
                    mark_generated(file);
                }
                let text = self.with_disclaimer(renderer.render(file)?);
                let path = Path::new(&ns.path).join(&file.name);
                debug!(path = %path.display(), bytes = text.len(), "rendered");
                out.push(RenderedFile {
                    path,
                    package: file.package_name.clone(),
                    text,
                });
            }
        }
        Ok(out)
    }

    fn with_disclaimer(&self, text: String) -> String {
        let disclaimer = &self.config.disclaimer;
        if disclaimer.is_empty() || text.starts_with(disclaimer.as_str()) {
            return text;
        }
        format!("{disclaimer}\n\n{text}")
    }
}

/// Adds the generated marker unless the file already carries one.
pub fn mark_generated(file: &mut File) {
    if !annotation::contains::<GeneratedAnnotation>(&file.annotations) {
        file.annotations.push(Box::new(GeneratedAnnotation));
    }
}
