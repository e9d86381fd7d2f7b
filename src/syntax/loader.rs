//! Rule set loading
//!
//! Turns one parsed rule definition into a compiled [`RuleSet`]. A bad rule
//! (unparseable pattern, unknown color, missing field) is logged and skipped
//! on its own; the rest of the definition still loads.

use indexmap::IndexMap;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use super::rules::{compile_pattern, Rule, RuleSet};
use super::style::{Color, Style};
use crate::error::{Result, SyntaxError};

/// One rule set definition as written in a configuration source
///
/// ```yaml
/// name: C/C++
/// keywords:
///   types:
///     - regex: "\\bint\\b"
///       color: "#ff0000"
///       bold: true
/// extensions: [c, h, cpp]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceData {
    /// Human-readable language name
    #[serde(default)]
    pub name: Option<String>,
    /// Category name -> rules, in document order
    #[serde(default)]
    pub keywords: Option<IndexMap<String, Option<CategoryEntry>>>,
    /// Extensions this definition claims
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
}

impl SourceData {
    /// Language name, or a placeholder when the definition has none
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    /// Extensions claimed by this definition, as written
    pub fn extensions(&self) -> &[String] {
        self.extensions.as_deref().unwrap_or_default()
    }
}

/// The rules of one category, or whatever else was found in its place
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CategoryEntry {
    Rules(Vec<RuleEntry>),
    Malformed(IgnoredAny),
}

impl CategoryEntry {
    /// Rule records of a well-formed category
    pub fn rules(&self) -> &[RuleEntry] {
        match self {
            CategoryEntry::Rules(rules) => rules,
            CategoryEntry::Malformed(_) => &[],
        }
    }
}

/// A rule record, or whatever else was found where a rule record belongs
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RuleEntry {
    Rule(RuleData),
    Malformed(IgnoredAny),
}

/// Raw rule record (strings as written in the file)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleData {
    /// Pattern text; bare YAML scalars like `42` are taken as written
    #[serde(default, deserialize_with = "scalar_text")]
    pub regex: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

/// Any scalar value, read back as text
#[derive(Deserialize)]
#[serde(untagged)]
enum ScalarText {
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

fn scalar_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<ScalarText>::deserialize(deserializer)?;
    Ok(value.map(|scalar| match scalar {
        ScalarText::Text(text) => text,
        ScalarText::Int(n) => n.to_string(),
        ScalarText::UInt(n) => n.to_string(),
        ScalarText::Float(n) => n.to_string(),
        ScalarText::Bool(b) => b.to_string(),
    }))
}

impl RuleData {
    /// Compile this record into a rule
    pub fn build(&self, backtrack_limit: usize) -> Result<Rule> {
        let regex = self
            .regex
            .as_deref()
            .ok_or(SyntaxError::MissingField { field: "regex" })?;
        let color = self
            .color
            .as_deref()
            .ok_or(SyntaxError::MissingField { field: "color" })?;

        let pattern = compile_pattern(regex, backtrack_limit)?;
        let mut style = Style::fg(Color::parse(color)?);
        style.bold = self.bold;
        style.italic = self.italic;
        Ok(Rule { pattern, style })
    }
}

/// Build the rule set for one definition.
///
/// Categories are taken in document order and rules in order within each
/// category. Never fails: an absent or empty `keywords` section gives an
/// empty set.
pub fn load_rule_set(data: &SourceData, backtrack_limit: usize) -> RuleSet {
    let mut set = RuleSet::new(data.display_name());
    for ext in data.extensions() {
        set.add_extension(ext);
    }

    let Some(keywords) = &data.keywords else {
        tracing::debug!(language = %set.name, "no keywords section");
        return set;
    };

    for (category, entries) in keywords {
        if let Some(CategoryEntry::Malformed(_)) = entries {
            tracing::warn!(
                language = %set.name,
                category = category.as_str(),
                "skipping category: expected a list of rules"
            );
            continue;
        }
        let records = entries.as_ref().map(CategoryEntry::rules).unwrap_or_default();
        for (index, entry) in records.iter().enumerate() {
            let built = match entry {
                RuleEntry::Rule(rule) => rule.build(backtrack_limit),
                RuleEntry::Malformed(_) => Err(SyntaxError::MalformedRule),
            };
            match built {
                Ok(rule) => set.push(rule),
                Err(e) => {
                    tracing::warn!(
                        language = %set.name,
                        category = category.as_str(),
                        index,
                        "skipping rule: {}",
                        e
                    );
                }
            }
        }
    }

    tracing::debug!(language = %set.name, rules = set.len(), "loaded rule set");
    set
}
