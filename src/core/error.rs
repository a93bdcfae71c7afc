//! Error handling for the go-gen scaffolding library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. Every failure is terminal for
//! the generation call that produced it; nothing is retried.
//!
//! # Examples
//!
//! ```
//! use go_gen::core::error::{Error, Result};
//!
//! fn check(type_name: &str) -> Result<()> {
//!     if type_name.is_empty() {
//!         return Err(Error::validation("type is required"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check("").is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type for go-gen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for go-gen operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generation parameters rejected before any file is touched
    #[error("{0}")]
    Validation(String),

    /// Unrecognised naming style token
    #[error("unknown naming style: {0}")]
    UnknownStyle(String),

    /// An external command ran but exited unsuccessfully
    #[error("{command} failed ({status}): {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },

    /// An external command could not be started
    #[error("failed to run {command}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Remote template source could not be resolved to a local directory
    #[error("resolve template source: {0}")]
    Resolve(String),

    /// Checkout cache could not be created or cleared
    #[error("prepare template cache {}", path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Template directory could not be walked
    #[error("walk template directory {}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Template file failed to parse
    #[error("parse template {}", path.display())]
    TemplateParse {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    /// Template file failed to render
    #[error("execute template {}", path.display())]
    TemplateRender {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    /// Output file could not be created
    #[error("create output file {}", path.display())]
    OutputCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Template data could not be turned into a render context
    #[error("build template context: {0}")]
    Context(String),
}

impl Error {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new resolution error
    pub fn resolve<S: Into<String>>(msg: S) -> Self {
        Self::Resolve(msg.into())
    }
}
