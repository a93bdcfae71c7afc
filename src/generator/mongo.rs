//! MongoDB model generator.

use std::fs;
use std::path::Path;

use tracing::info;

use super::{BaseGenerator, Generator};
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::core::naming::Style;
use crate::core::templates::{TemplateEngine, TemplateResolver, TemplateSource};

/// Generates MongoDB model code from templates
#[derive(Debug, Clone)]
pub struct MongoGenerator {
    base: BaseGenerator,
    resolver: TemplateResolver,
}

impl MongoGenerator {
    /// Create a generator resolving remote templates through `git`
    pub fn new(base: BaseGenerator, config: &Config) -> Self {
        Self::with_resolver(base, TemplateResolver::from_config(config))
    }

    /// Create a generator with an explicit resolver
    pub fn with_resolver(mut base: BaseGenerator, resolver: TemplateResolver) -> Self {
        if base.file_style.is_empty() {
            base.file_style = Style::default().as_str().to_string();
        }
        Self { base, resolver }
    }

    pub fn base(&self) -> &BaseGenerator {
        &self.base
    }

    fn file_style(&self) -> Result<Style> {
        self.base
            .file_style
            .parse()
            .map_err(|_| Error::validation(format!("invalid file style: {}", self.base.file_style)))
    }
}

impl Generator for MongoGenerator {
    fn validate(&self) -> Result<()> {
        self.base.validate()?;
        self.file_style()?;

        let template = &self.base.template;
        if !TemplateSource::is_remote(template) && !Path::new(template).exists() {
            return Err(Error::validation(format!("invalid template path: {template}")));
        }
        Ok(())
    }

    fn generate(&self) -> Result<()> {
        self.validate()?;
        let style = self.file_style()?;

        fs::create_dir_all(&self.base.output_dir)?;

        let engine = TemplateEngine::new(style, self.resolver.clone());
        let written = engine.generate(&self.base.template, &self.base.output_dir, &self.base.type_name)?;

        info!(
            type_name = %self.base.type_name,
            files = written.len(),
            "Generated MongoDB model"
        );
        Ok(())
    }
}
