//! Configuration sources
//!
//! A configuration source is one rule file: YAML (possibly several
//! `---`-separated definitions) or TOML (one definition). Sources are
//! parsed up front into [`SourceData`]; compiling the rules is left to
//! whoever builds a highlighter from them.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::loader::SourceData;
use crate::error::{Result, SyntaxError};

// Embed the bundled rule files at compile time
pub const CPP_YAML: &str = include_str!("../../syntaxes/cpp.yaml");
pub const GO_YAML: &str = include_str!("../../syntaxes/go.yaml");
pub const PYTHON_YAML: &str = include_str!("../../syntaxes/python.yaml");
pub const RUST_YAML: &str = include_str!("../../syntaxes/rust.yaml");

/// A bundled rule file
pub struct BundledSource {
    /// File name it was compiled from
    pub id: &'static str,
    /// Embedded YAML content
    pub yaml: &'static str,
}

/// All bundled rule files, in search order
pub const BUNDLED_SOURCES: &[BundledSource] = &[
    BundledSource {
        id: "cpp.yaml",
        yaml: CPP_YAML,
    },
    BundledSource {
        id: "go.yaml",
        yaml: GO_YAML,
    },
    BundledSource {
        id: "python.yaml",
        yaml: PYTHON_YAML,
    },
    BundledSource {
        id: "rust.yaml",
        yaml: RUST_YAML,
    },
];

/// File extensions recognised as rule files
const SOURCE_EXTENSIONS: &[&str] = &["yaml", "yml", "toml"];

/// Where a source came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    /// A file on disk
    File(PathBuf),
    /// A rule file embedded in the binary
    Bundled(&'static str),
}

impl SourceOrigin {
    /// File stem used as the language name when a definition has none
    fn stem(&self) -> String {
        let name = match self {
            SourceOrigin::File(path) => path.file_stem().and_then(|s| s.to_str()),
            SourceOrigin::Bundled(id) => Path::new(id).file_stem().and_then(|s| s.to_str()),
        };
        name.unwrap_or("unnamed").to_string()
    }
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceOrigin::File(path) => write!(f, "{}", path.display()),
            SourceOrigin::Bundled(id) => write!(f, "<bundled>/{}", id),
        }
    }
}

/// One parsed rule file
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub origin: SourceOrigin,
    /// Rule set definitions, in file order
    pub definitions: Vec<SourceData>,
}

impl ConfigSource {
    /// Parse YAML text; each `---` document is one definition
    pub fn from_yaml(origin: SourceOrigin, text: &str) -> Result<Self> {
        let mut definitions = Vec::new();
        if !text.trim().is_empty() {
            for document in serde_yaml::Deserializer::from_str(text) {
                let data = Option::<SourceData>::deserialize(document).map_err(|source| {
                    SyntaxError::Yaml {
                        origin: origin.to_string(),
                        source,
                    }
                })?;
                definitions.extend(data);
            }
        }
        Ok(Self::new(origin, definitions))
    }

    /// Parse TOML text holding a single definition
    pub fn from_toml(origin: SourceOrigin, text: &str) -> Result<Self> {
        let data: SourceData = toml::from_str(text).map_err(|source| SyntaxError::Toml {
            origin: origin.to_string(),
            source,
        })?;
        Ok(Self::new(origin, vec![data]))
    }

    /// Read and parse a rule file, picking the format from its extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let format = source_format(path)
            .ok_or_else(|| SyntaxError::UnsupportedFormat(path.to_path_buf()))?;
        let text = fs::read_to_string(path).map_err(|source| SyntaxError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let origin = SourceOrigin::File(path.to_path_buf());
        if format == "toml" {
            Self::from_toml(origin, &text)
        } else {
            Self::from_yaml(origin, &text)
        }
    }

    /// Parse one bundled rule file
    pub fn from_bundled(bundled: &BundledSource) -> Result<Self> {
        Self::from_yaml(SourceOrigin::Bundled(bundled.id), bundled.yaml)
    }

    fn new(origin: SourceOrigin, mut definitions: Vec<SourceData>) -> Self {
        let stem = origin.stem();
        for data in &mut definitions {
            if data.name.is_none() {
                data.name = Some(stem.clone());
            }
        }
        Self {
            origin,
            definitions,
        }
    }
}

/// Check whether a path looks like a rule file
pub fn is_source_file(path: &Path) -> bool {
    source_format(path).is_some()
}

fn source_format(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    SOURCE_EXTENSIONS.iter().copied().find(|known| *known == ext)
}

/// Load every rule file in `dir`, sorted by file name.
///
/// A missing directory yields nothing. A file that can't be read or
/// parsed is logged and skipped; the others still load.
pub fn discover(dir: &Path) -> Vec<ConfigSource> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("No rule directory at {}", dir.display());
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!("Failed to scan rule directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_source_file(path))
        .collect();
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    tracing::debug!("Scanning {} ({} rule files)", dir.display(), paths.len());

    paths
        .iter()
        .filter_map(|path| match ConfigSource::from_path(path) {
            Ok(source) => {
                tracing::info!(
                    "Loaded {} definition(s) from {}",
                    source.definitions.len(),
                    path.display()
                );
                Some(source)
            }
            Err(e) => {
                tracing::warn!("Skipping rule file: {}", e);
                None
            }
        })
        .collect()
}

/// Parse all bundled rule files
pub fn bundled_sources() -> Vec<ConfigSource> {
    BUNDLED_SOURCES
        .iter()
        .filter_map(|bundled| match ConfigSource::from_bundled(bundled) {
            Ok(source) => Some(source),
            Err(e) => {
                tracing::warn!("Skipping bundled rule file: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::loader::load_rule_set;
    use crate::syntax::rules::DEFAULT_BACKTRACK_LIMIT;

    fn origin() -> SourceOrigin {
        SourceOrigin::File(PathBuf::from("/rules/lang.yaml"))
    }

    #[test]
    fn test_yaml_single_definition() {
        let source = ConfigSource::from_yaml(
            origin(),
            "keywords:\n  k:\n    - regex: a\n      color: red\nextensions: [a]\n",
        )
        .unwrap();
        assert_eq!(source.definitions.len(), 1);
        assert_eq!(source.definitions[0].name.as_deref(), Some("lang"));
        assert_eq!(source.definitions[0].extensions(), ["a"]);
    }

    #[test]
    fn test_yaml_multiple_documents() {
        let text = "name: One\nextensions: [one]\n---\nname: Two\nextensions: [two]\n";
        let source = ConfigSource::from_yaml(origin(), text).unwrap();
        let names: Vec<_> = source.definitions.iter().map(|d| d.display_name()).collect();
        assert_eq!(names, vec!["One", "Two"]);
    }

    #[test]
    fn test_yaml_empty_file_has_no_definitions() {
        let source = ConfigSource::from_yaml(origin(), "  \n").unwrap();
        assert!(source.definitions.is_empty());
    }

    #[test]
    fn test_yaml_bad_top_level_is_an_error() {
        let err = ConfigSource::from_yaml(origin(), "keywords: [1, 2\n").unwrap_err();
        assert!(matches!(err, SyntaxError::Yaml { .. }));

        let err = ConfigSource::from_yaml(origin(), "keywords: just text\n").unwrap_err();
        assert!(matches!(err, SyntaxError::Yaml { .. }));
    }

    #[test]
    fn test_toml_definition() {
        let text = r##"
name = "Toy"
extensions = ["toy"]

[[keywords.zeta]]
regex = '\bfirst\b'
color = "#ff0000"
bold = true

[[keywords.alpha]]
regex = '\bsecond\b'
color = "navy"

[[keywords.alpha]]
regex = '('
color = "navy"
"##;
        let source =
            ConfigSource::from_toml(SourceOrigin::File(PathBuf::from("toy.toml")), text).unwrap();
        let data = &source.definitions[0];
        assert_eq!(data.display_name(), "Toy");

        let set = load_rule_set(data, DEFAULT_BACKTRACK_LIMIT);
        let patterns: Vec<_> = set.rules().iter().map(|r| r.as_str()).collect();
        assert_eq!(patterns, vec![r"\bfirst\b", r"\bsecond\b"]);
        assert!(set.rules()[0].style.bold);
    }

    #[test]
    fn test_is_source_file() {
        assert!(is_source_file(Path::new("c.yaml")));
        assert!(is_source_file(Path::new("c.YML")));
        assert!(is_source_file(Path::new("c.toml")));
        assert!(!is_source_file(Path::new("c.json")));
        assert!(!is_source_file(Path::new("yaml")));
    }

    #[test]
    fn test_bundled_sources_load_every_rule() {
        let sources = bundled_sources();
        assert_eq!(sources.len(), BUNDLED_SOURCES.len());
        for source in &sources {
            for data in &source.definitions {
                let records: usize = data
                    .keywords
                    .iter()
                    .flat_map(|k| k.values())
                    .flatten()
                    .map(|category| category.rules().len())
                    .sum();
                let set = load_rule_set(data, DEFAULT_BACKTRACK_LIMIT);
                assert_eq!(set.len(), records, "{} lost rules", source.origin);
                assert!(!set.extensions.is_empty());
            }
        }
    }

    #[test]
    fn test_origin_display() {
        assert_eq!(SourceOrigin::Bundled("go.yaml").to_string(), "<bundled>/go.yaml");
    }
}
