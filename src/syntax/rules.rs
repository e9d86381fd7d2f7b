//! Highlighting rules
//!
//! A rule pairs a compiled pattern with the style applied to its matches.
//! Rules live in an ordered [`RuleSet`]; their position in the set is the
//! only thing deciding which one wins on overlapping text.

use fancy_regex::{Regex, RegexBuilder};

use super::style::Style;
use crate::error::{Result, SyntaxError};

/// Backtracking budget per match attempt, matching fancy-regex's own default
pub const DEFAULT_BACKTRACK_LIMIT: usize = 1_000_000;

/// A single highlighting rule
#[derive(Debug, Clone)]
pub struct Rule {
    /// Compiled pattern
    pub pattern: Regex,
    /// Style to assign to matches
    pub style: Style,
}

impl Rule {
    /// Compile a rule with the default backtracking limit
    pub fn new(pattern: &str, style: Style) -> Result<Self> {
        Self::with_backtrack_limit(pattern, style, DEFAULT_BACKTRACK_LIMIT)
    }

    /// Compile a rule with an explicit backtracking limit
    pub fn with_backtrack_limit(pattern: &str, style: Style, limit: usize) -> Result<Self> {
        Ok(Self {
            pattern: compile_pattern(pattern, limit)?,
            style,
        })
    }

    /// Source text of the pattern
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// All non-overlapping, non-empty matches in `text` as `(start, len)`.
    ///
    /// Fails if the matcher gives up part way through (e.g. the backtrack
    /// limit is hit); matches found before that point are discarded.
    pub fn find_all(&self, text: &str) -> std::result::Result<Vec<(usize, usize)>, fancy_regex::Error> {
        let mut found = Vec::new();
        for m in self.pattern.find_iter(text) {
            let m = m?;
            if m.end() > m.start() {
                found.push((m.start(), m.end() - m.start()));
            }
        }
        Ok(found)
    }
}

/// Ordered rules for one language
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    /// Human-readable language name (e.g. "C/C++")
    pub name: String,
    /// File extensions, lower-case without leading dot
    pub extensions: Vec<String>,
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Create an empty rule set
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            extensions: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Add a file extension (normalised)
    pub fn add_extension(&mut self, ext: &str) {
        let ext = normalize_extension(ext);
        if !ext.is_empty() && !self.extensions.contains(&ext) {
            self.extensions.push(ext);
        }
    }

    /// Check whether this set claims an extension (case-insensitive)
    pub fn handles_extension(&self, ext: &str) -> bool {
        let ext = normalize_extension(ext);
        self.extensions.iter().any(|e| *e == ext)
    }

    /// Append an already compiled rule
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Compile and append a rule. Call order is application order.
    pub fn add_pattern(&mut self, pattern: &str, style: Style) -> Result<()> {
        self.rules.push(Rule::new(pattern, style)?);
        Ok(())
    }

    /// Rules in application order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the set has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Compile a pattern with the given backtracking limit
pub(crate) fn compile_pattern(pattern: &str, limit: usize) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .backtrack_limit(limit)
        .build()
        .map_err(|e| SyntaxError::InvalidPattern {
            pattern: pattern.to_string(),
            source: Box::new(e),
        })
}

/// Lower-case an extension and strip any leading dots
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}
