//! go-gen core library
//!
//! Naming conversion, configuration, errors and the template system.

pub mod config;
pub mod error;
pub mod naming;
pub mod templates;

pub use error::Error;
