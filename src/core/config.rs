//! Runtime configuration for template resolution.
//!
//! Defaults can be overridden through the environment:
//!
//! - `GO_GEN_CACHE_DIR`: root directory for cached template checkouts
//!   (default `~/.go-gen`)
//! - `GO_GEN_TEMPLATE`: template source used when `--template` is omitted

use std::path::PathBuf;

use crate::core::error::{Error, Result};

/// Template repository used when the caller does not name one
pub const DEFAULT_TEMPLATE: &str = "git@github.com:Lewinz/go-gen.git";

/// Name of the cache directory inside the user's home directory
pub const CACHE_DIR_NAME: &str = ".go-gen";

/// Suffix identifying template files
pub const TEMPLATE_SUFFIX: &str = "tpl";

/// Suffix given to generated files
pub const OUTPUT_SUFFIX: &str = "go";

/// Trait for reading configuration overrides, allowing dependency injection for testing
pub trait ConfigReader {
    fn cache_dir(&self) -> Option<String>;
    fn default_template(&self) -> Option<String>;
}

/// Production implementation that reads from environment variables
pub struct EnvConfigReader;

impl ConfigReader for EnvConfigReader {
    fn cache_dir(&self) -> Option<String> {
        std::env::var("GO_GEN_CACHE_DIR")
            .ok()
            .filter(|v| !v.is_empty())
    }

    fn default_template(&self) -> Option<String> {
        std::env::var("GO_GEN_TEMPLATE")
            .ok()
            .filter(|v| !v.is_empty())
    }
}

/// Mock implementation for testing with controlled values
#[cfg(test)]
pub struct MockConfigReader {
    pub cache_dir: Option<String>,
    pub default_template: Option<String>,
}

#[cfg(test)]
impl ConfigReader for MockConfigReader {
    fn cache_dir(&self) -> Option<String> {
        self.cache_dir.clone()
    }

    fn default_template(&self) -> Option<String> {
        self.default_template.clone()
    }
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding one checkout per remote template source
    pub cache_root: PathBuf,
    /// Template source used when none is given
    pub default_template: String,
}

impl Config {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::from_reader(&EnvConfigReader)
    }

    /// Build configuration from an arbitrary reader
    pub fn from_reader(reader: &dyn ConfigReader) -> Result<Self> {
        let cache_root = match reader.cache_dir() {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .ok_or_else(|| Error::resolve("get home dir: no home directory found"))?
                .join(CACHE_DIR_NAME),
        };

        let default_template = reader
            .default_template()
            .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string());

        Ok(Self {
            cache_root,
            default_template,
        })
    }
}
