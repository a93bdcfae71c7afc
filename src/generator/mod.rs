//! Model generators.
//!
//! Every backend implements [`Generator`]; the parameters shared by all of
//! them live in [`BaseGenerator`].

pub mod mongo;

pub use mongo::MongoGenerator;

use crate::core::error::{Error, Result};

/// A code generator for one model backend
pub trait Generator {
    /// Check the generation parameters without touching the filesystem
    fn validate(&self) -> Result<()>;

    /// Validate, then write the generated files
    fn generate(&self) -> Result<()>;
}

/// Parameters shared by every generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseGenerator {
    /// Model type name
    pub type_name: String,
    /// Output directory
    pub output_dir: String,
    /// Template directory or repository URL
    pub template: String,
    /// File naming style token
    pub file_style: String,
}

impl BaseGenerator {
    pub fn new(
        type_name: impl Into<String>,
        output_dir: impl Into<String>,
        template: impl Into<String>,
        file_style: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            output_dir: output_dir.into(),
            template: template.into(),
            file_style: file_style.into(),
        }
    }

    /// Reject missing required parameters
    pub fn validate(&self) -> Result<()> {
        if self.type_name.is_empty() {
            return Err(Error::validation("type is required"));
        }
        if self.output_dir.is_empty() {
            return Err(Error::validation("output directory is required"));
        }
        if self.template.is_empty() {
            return Err(Error::validation("template directory is required"));
        }
        Ok(())
    }
}
