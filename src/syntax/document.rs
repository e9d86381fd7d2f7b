//! Highlighted documents
//!
//! A [`Document`] is the text of one open file split into blocks (lines),
//! together with the highlighter bound to it and a cached format per block.
//! Editing a block only invalidates that block; blocks never depend on
//! each other.

use super::highlighter::Highlighter;
use super::registry::SyntaxRegistry;
use super::style::BlockFormat;

/// What a document is bound to
#[derive(Debug, Default)]
pub enum Binding {
    /// Not yet opened against a registry
    #[default]
    Unbound,
    /// Opened, but no language claims the extension
    Plain,
    /// Opened with an active highlighter
    Highlighted(Highlighter),
}

/// The blocks of an open file plus their cached formats
#[derive(Debug)]
pub struct Document {
    lines: Vec<String>,
    binding: Binding,
    /// Cached formats per block (None = not computed)
    formats: Vec<Option<BlockFormat>>,
}

impl Document {
    /// Create an unbound document from text
    pub fn new(text: &str) -> Self {
        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        let formats = vec![None; lines.len()];
        Self {
            lines,
            binding: Binding::Unbound,
            formats,
        }
    }

    /// Create a document and bind it for `extension`
    pub fn open(text: &str, extension: &str, registry: &SyntaxRegistry) -> Self {
        let mut doc = Self::new(text);
        doc.bind(extension, registry);
        doc
    }

    /// Bind to whatever highlighter the registry has for `extension`.
    ///
    /// Any previous highlighter is dropped and a new one built; every
    /// cached format is discarded. Returns whether a highlighter was found.
    pub fn bind(&mut self, extension: &str, registry: &SyntaxRegistry) -> bool {
        self.binding = match registry.create_highlighter(extension) {
            Some(highlighter) => Binding::Highlighted(highlighter),
            None => Binding::Plain,
        };
        self.invalidate_all();
        self.is_highlighted()
    }

    /// Bind to a specific highlighter
    pub fn bind_highlighter(&mut self, highlighter: Highlighter) {
        self.binding = Binding::Highlighted(highlighter);
        self.invalidate_all();
    }

    /// Current binding
    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// Active highlighter, if any
    pub fn highlighter(&self) -> Option<&Highlighter> {
        match &self.binding {
            Binding::Highlighted(highlighter) => Some(highlighter),
            _ => None,
        }
    }

    /// Check whether an active highlighter is bound
    pub fn is_highlighted(&self) -> bool {
        matches!(self.binding, Binding::Highlighted(_))
    }

    /// Number of blocks
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Text of one block
    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    /// All blocks joined with newlines
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Replace the text of a block
    pub fn set_line(&mut self, idx: usize, text: &str) {
        if let Some(line) = self.lines.get_mut(idx) {
            *line = text.to_string();
            self.formats[idx] = None;
        }
    }

    /// Insert a block before `idx` (or append when `idx == line_count()`)
    pub fn insert_line(&mut self, idx: usize, text: &str) {
        let idx = idx.min(self.lines.len());
        self.lines.insert(idx, text.to_string());
        self.formats.insert(idx, None);
    }

    /// Remove a block, returning its text
    pub fn remove_line(&mut self, idx: usize) -> Option<String> {
        if idx >= self.lines.len() {
            return None;
        }
        self.formats.remove(idx);
        let removed = self.lines.remove(idx);
        if self.lines.is_empty() {
            self.lines.push(String::new());
            self.formats.push(None);
        }
        Some(removed)
    }

    /// Check whether a block's format is cached
    pub fn is_cached(&self, idx: usize) -> bool {
        matches!(self.formats.get(idx), Some(Some(_)))
    }

    /// Drop every cached format
    pub fn invalidate_all(&mut self) {
        self.formats.iter_mut().for_each(|f| *f = None);
    }

    /// Format for one block, highlighting it if it isn't cached.
    ///
    /// Unbound and plain documents get an unstyled format.
    pub fn block_format(&mut self, idx: usize) -> Option<&BlockFormat> {
        let text = self.lines.get(idx)?;
        let slot = &mut self.formats[idx];
        if slot.is_none() {
            let mut format = BlockFormat::new(text.len());
            if let Binding::Highlighted(highlighter) = &self.binding {
                highlighter.highlight_block(text, &mut format);
            }
            *slot = Some(format);
        }
        slot.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::source::{ConfigSource, SourceOrigin};
    use crate::syntax::style::{Color, Style, StyledSpan};
    use std::path::PathBuf;

    fn registry() -> SyntaxRegistry {
        let source = ConfigSource::from_yaml(
            SourceOrigin::File(PathBuf::from("c.yaml")),
            r##"
keywords:
  types:
    - regex: "\\bint\\b"
      color: "#ff0000"
      bold: true
extensions: [c]
"##,
        )
        .unwrap();
        SyntaxRegistry::from_sources(vec![source])
    }

    fn red_bold() -> Style {
        Style::fg(Color::rgb(255, 0, 0)).with_bold()
    }

    #[test]
    fn test_unbound_to_highlighted() {
        let registry = registry();
        let mut doc = Document::new("int x = 0;\nreturn x;");
        assert!(matches!(doc.binding(), Binding::Unbound));
        assert!(doc.block_format(0).unwrap().is_plain());

        assert!(doc.bind("c", &registry));
        assert!(doc.is_highlighted());
        assert_eq!(
            doc.block_format(0).unwrap().runs(),
            vec![StyledSpan::new(0, 3, red_bold())]
        );
        assert!(doc.block_format(1).unwrap().is_plain());
    }

    #[test]
    fn test_unknown_extension_is_plain() {
        let registry = registry();
        let mut doc = Document::open("int x;", "txt", &registry);
        assert!(matches!(doc.binding(), Binding::Plain));
        assert!(doc.highlighter().is_none());
        assert!(doc.block_format(0).unwrap().is_plain());
    }

    #[test]
    fn test_edit_invalidates_only_that_block() {
        let registry = registry();
        let mut doc = Document::open("int a;\nint b;\nint c;", "c", &registry);
        for idx in 0..3 {
            doc.block_format(idx);
        }

        doc.set_line(1, "long b;");
        assert!(doc.is_cached(0));
        assert!(!doc.is_cached(1));
        assert!(doc.is_cached(2));
        assert!(doc.block_format(1).unwrap().is_plain());

        doc.insert_line(1, "int z;");
        assert!(!doc.is_cached(1));
        assert!(doc.is_cached(2));
        assert_eq!(doc.line(2), Some("long b;"));

        assert_eq!(doc.remove_line(0).as_deref(), Some("int a;"));
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.text(), "int z;\nlong b;\nint c;");
    }

    #[test]
    fn test_rebind_replaces_engine() {
        let registry = registry();
        let mut doc = Document::open("int a;", "c", &registry);
        doc.block_format(0);

        assert!(!doc.bind("txt", &registry));
        assert!(!doc.is_cached(0));
        assert!(doc.block_format(0).unwrap().is_plain());
    }

    #[test]
    fn test_remove_last_line_keeps_one_block() {
        let mut doc = Document::new("");
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.remove_line(0).as_deref(), Some(""));
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.remove_line(5), None);
    }
}
