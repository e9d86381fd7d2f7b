//! Highlighter engine
//!
//! A [`Highlighter`] owns the ordered rules for one open document and
//! styles that document one block (line) at a time. Blocks are independent:
//! highlighting a block looks at nothing but its own text.

use super::loader::{load_rule_set, SourceData};
use super::rules::{Rule, RuleSet, DEFAULT_BACKTRACK_LIMIT};
use super::style::{BlockFormat, Style, StyledSpan};
use crate::error::Result;

/// Applies an ordered rule set to blocks of text
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    rules: RuleSet,
}

impl Highlighter {
    /// Create a highlighter over an already built rule set
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Load the rule set from a parsed definition and wrap it
    pub fn from_source(data: &SourceData) -> Self {
        Self::new(load_rule_set(data, DEFAULT_BACKTRACK_LIMIT))
    }

    /// Compile a pattern and append it as the last rule
    pub fn add_pattern(&mut self, pattern: &str, style: Style) -> Result<()> {
        self.rules.add_pattern(pattern, style)
    }

    /// Append an already compiled rule
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// The rules, in application order
    pub fn rule_set(&self) -> &RuleSet {
        &self.rules
    }

    /// Language name of the rule set
    pub fn language(&self) -> &str {
        &self.rules.name
    }

    /// Spans for one block, in rule order.
    ///
    /// Each rule contributes every non-overlapping match of its pattern.
    /// Spans from different rules may overlap; when written onto a block
    /// in this order a later rule's span wins.
    ///
    /// A rule whose matcher fails on this text (backtrack limit exceeded)
    /// contributes nothing for this block and the pass carries on.
    pub fn spans(&self, text: &str) -> Vec<StyledSpan> {
        let mut spans = Vec::new();
        for (index, rule) in self.rules.rules().iter().enumerate() {
            match rule.find_all(text) {
                Ok(matches) => spans.extend(
                    matches
                        .into_iter()
                        .map(|(start, len)| StyledSpan::new(start, len, rule.style)),
                ),
                Err(e) => {
                    tracing::warn!(
                        language = %self.rules.name,
                        rule = index,
                        pattern = rule.as_str(),
                        "skipping rule for block: {}",
                        e
                    );
                }
            }
        }
        spans
    }

    /// Restyle one block from scratch.
    ///
    /// Whatever `format` held before is dropped, so running this twice on
    /// the same text gives the same result.
    pub fn highlight_block(&self, text: &str, format: &mut BlockFormat) {
        format.reset(text.len());
        format.apply(&self.spans(text));
    }
}
