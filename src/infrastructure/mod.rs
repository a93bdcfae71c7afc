//! Infrastructure layer - concrete implementations of external capabilities

pub mod shell;

pub use shell::*;
