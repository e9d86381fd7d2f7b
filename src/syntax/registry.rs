//! Highlighter registry
//!
//! The [`SyntaxRegistry`] maps a file extension to a rule definition and
//! builds a fresh [`Highlighter`] from it. Configuration sources are read
//! once, on first use, and shared read-only by every lookup after that.
//!
//! Search order is deterministic: tiers in [`SearchPath`] order, files
//! within a directory by name, definitions within a file in file order.
//! The first definition claiming an extension wins; later claims are
//! reported when the sources load.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

use super::highlighter::Highlighter;
use super::loader::{load_rule_set, SourceData};
use super::rules::{normalize_extension, DEFAULT_BACKTRACK_LIMIT};
use super::source::{bundled_sources, discover, ConfigSource, SourceOrigin};
use crate::config::{SearchPath, SourceTier};

/// Registry tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryOptions {
    /// Backtracking budget for every compiled pattern
    pub backtrack_limit: usize,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            backtrack_limit: DEFAULT_BACKTRACK_LIMIT,
        }
    }
}

/// A language the registry can highlight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageInfo {
    pub name: String,
    /// Normalised extensions as declared (including shadowed ones)
    pub extensions: Vec<String>,
    pub origin: SourceOrigin,
}

/// Extension -> highlighter factory
pub struct SyntaxRegistry {
    search_path: SearchPath,
    options: RegistryOptions,
    sources: OnceLock<Vec<ConfigSource>>,
}

impl SyntaxRegistry {
    /// Create a registry that loads sources from `search_path` on first use
    pub fn new(search_path: SearchPath) -> Self {
        Self::with_options(search_path, RegistryOptions::default())
    }

    /// Create a registry with explicit options
    pub fn with_options(search_path: SearchPath, options: RegistryOptions) -> Self {
        Self {
            search_path,
            options,
            sources: OnceLock::new(),
        }
    }

    /// Registry over the default tiers (env override, user dir, bundled)
    pub fn from_env() -> Self {
        Self::new(SearchPath::from_env())
    }

    /// Registry over sources that are already loaded, in search order
    pub fn from_sources(sources: Vec<ConfigSource>) -> Self {
        let registry = Self::new(SearchPath::new(Vec::new()));
        report_shadowed_claims(&sources);
        let _ = registry.sources.set(sources);
        registry
    }

    /// Loaded sources in search order, loading them if needed
    pub fn sources(&self) -> &[ConfigSource] {
        self.sources.get_or_init(|| {
            let sources = load_sources(&self.search_path);
            report_shadowed_claims(&sources);
            sources
        })
    }

    /// Find the definition claiming `extension` (case-insensitive, leading dot optional)
    pub fn find_definition(&self, extension: &str) -> Option<(&ConfigSource, &SourceData)> {
        let ext = normalize_extension(extension);
        if ext.is_empty() {
            return None;
        }
        self.sources().iter().find_map(|source| {
            source
                .definitions
                .iter()
                .find(|data| data.extensions().iter().any(|e| normalize_extension(e) == ext))
                .map(|data| (source, data))
        })
    }

    /// Build a highlighter for `extension`.
    ///
    /// `None` means no configured language claims the extension; the
    /// document should be shown as plain text.
    pub fn create_highlighter(&self, extension: &str) -> Option<Highlighter> {
        tracing::debug!("Creating highlighter for extension: {}", extension);
        match self.find_definition(extension) {
            Some((source, data)) => {
                tracing::debug!(
                    "{} highlighter selected from {}",
                    data.display_name(),
                    source.origin
                );
                let rules = load_rule_set(data, self.options.backtrack_limit);
                Some(Highlighter::new(rules))
            }
            None => {
                tracing::debug!("No highlighter available for {:?}", extension);
                None
            }
        }
    }

    /// Build a highlighter for a file, going by its extension
    pub fn create_highlighter_for_path(&self, path: &Path) -> Option<Highlighter> {
        let ext = path.extension()?.to_str()?;
        self.create_highlighter(ext)
    }

    /// Every configured language, in search order
    pub fn languages(&self) -> Vec<LanguageInfo> {
        self.sources()
            .iter()
            .flat_map(|source| {
                source.definitions.iter().map(|data| LanguageInfo {
                    name: data.display_name().to_string(),
                    extensions: data
                        .extensions()
                        .iter()
                        .map(|e| normalize_extension(e))
                        .collect(),
                    origin: source.origin.clone(),
                })
            })
            .collect()
    }
}

impl Default for SyntaxRegistry {
    fn default() -> Self {
        Self::from_env()
    }
}

fn load_sources(search_path: &SearchPath) -> Vec<ConfigSource> {
    let mut sources = Vec::new();
    for tier in search_path.tiers() {
        match tier {
            SourceTier::Override(dir) | SourceTier::User(dir) => sources.extend(discover(dir)),
            SourceTier::Bundled => sources.extend(bundled_sources()),
        }
    }
    tracing::info!("Loaded {} rule source(s)", sources.len());
    sources
}

/// Warn about extensions claimed more than once; the first claim wins.
///
/// Returns the shadowed claims as `(extension, shadowed origin)`.
fn report_shadowed_claims(sources: &[ConfigSource]) -> Vec<(String, SourceOrigin)> {
    let mut claimed: HashMap<String, (&SourceOrigin, &str)> = HashMap::new();
    let mut shadowed = Vec::new();
    for source in sources {
        for data in &source.definitions {
            let mut own = HashSet::new();
            for ext in data.extensions() {
                let ext = normalize_extension(ext);
                if ext.is_empty() || !own.insert(ext.clone()) {
                    continue;
                }
                match claimed.get(&ext) {
                    Some((origin, name)) => {
                        tracing::warn!(
                            "Extension {:?} of {} in {} is shadowed by {} in {}",
                            ext,
                            data.display_name(),
                            source.origin,
                            name,
                            origin
                        );
                        shadowed.push((ext, source.origin.clone()));
                    }
                    None => {
                        claimed.insert(ext, (&source.origin, data.display_name()));
                    }
                }
            }
        }
    }
    shadowed
}
