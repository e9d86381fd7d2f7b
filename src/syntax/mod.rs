//! Rule-driven syntax highlighting
//!
//! This module provides the highlighting core:
//! - Rules and rule sets (pattern + style, applied in order)
//! - Loading rule sets from YAML/TOML rule files
//! - The per-document highlighter engine
//! - The registry that picks a rule set by file extension

mod document;
mod highlighter;
mod loader;
mod registry;
mod rules;
mod source;
mod style;

pub use document::{Binding, Document};
pub use highlighter::Highlighter;
pub use loader::{load_rule_set, CategoryEntry, RuleData, RuleEntry, SourceData};
pub use registry::{LanguageInfo, RegistryOptions, SyntaxRegistry};
pub use rules::{normalize_extension, Rule, RuleSet, DEFAULT_BACKTRACK_LIMIT};
pub use source::{
    bundled_sources, discover, is_source_file, BundledSource, ConfigSource, SourceOrigin,
    BUNDLED_SOURCES,
};
pub use style::{BlockFormat, Color, Style, StyledSpan};
