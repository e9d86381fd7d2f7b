//! Error types for syntaxkit

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for syntaxkit operations
pub type Result<T> = std::result::Result<T, SyntaxError>;

/// Errors raised while building rules or reading configuration sources.
///
/// None of these escape the highlighting core as user-facing failures: the
/// loader and registry log them and move on to the next rule or source.
#[derive(Error, Debug)]
pub enum SyntaxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed YAML in {origin}: {source}")]
    Yaml {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Malformed TOML in {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<fancy_regex::Error>,
    },

    #[error("Invalid color: {0:?}")]
    InvalidColor(String),

    #[error("Missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("Rule record must be a mapping with regex, color, bold and italic")]
    MalformedRule,

    #[error("Unsupported configuration format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}
