//! syntaxkit - rule-driven syntax highlighting
//!
//! Highlighting rules (regex + style) are read from YAML or TOML rule
//! files, picked by file extension, and applied one block of text at a
//! time. See [`syntax::SyntaxRegistry`] for the entry point.

pub mod config;
pub mod error;
pub mod logging;
pub mod syntax;

pub use error::{Result, SyntaxError};
