//! Template system for model scaffolding.
//!
//! This module resolves template sources (local directories or git
//! repositories cached under the user's home directory) and renders the
//! `.tpl` files they contain into generated sources.

pub mod engine;
pub mod source;

pub use engine::*;
pub use source::*;
