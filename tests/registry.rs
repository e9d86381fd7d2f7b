//! Registry tests against real rule directories
//!
//! Tests for source discovery, skip-and-continue on bad files, search
//! order between tiers, and the end-to-end highlight of a block.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use syntaxkit::config::{SearchPath, SourceTier};
use syntaxkit::syntax::{
    discover, BlockFormat, Color, Document, SourceOrigin, Style, StyledSpan, SyntaxRegistry,
};

const C_RULES: &str = r##"
name: C
keywords:
  types:
    - regex: "\\bint\\b"
      color: "#ff0000"
      bold: true
extensions:
  - c
"##;

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

fn registry_for(dir: &Path) -> SyntaxRegistry {
    SyntaxRegistry::new(SearchPath::new(vec![SourceTier::Override(dir.to_path_buf())]))
}

// ========================================================================
// End-to-end
// ========================================================================

#[test]
fn test_int_rule_end_to_end() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "c.yaml", C_RULES);

    let registry = registry_for(dir.path());
    let highlighter = registry.create_highlighter("c").unwrap();

    let red_bold = Style::fg(Color::rgb(255, 0, 0)).with_bold();
    assert_eq!(
        highlighter.spans("int x = 0;"),
        vec![StyledSpan::new(0, 3, red_bold)]
    );

    let mut format = BlockFormat::default();
    highlighter.highlight_block("int x = 0;", &mut format);
    assert_eq!(format.runs(), vec![StyledSpan::new(0, 3, red_bold)]);
}

#[test]
fn test_cpp_extensions_and_miss() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "cpp.yml",
        "keywords:\n  k:\n    - regex: x\n      color: red\nextensions: [cpp, h, c]\n",
    );
    let registry = registry_for(dir.path());

    assert!(registry.create_highlighter("cpp").is_some());
    assert!(registry.create_highlighter("CPP").is_some());
    assert!(registry.create_highlighter("xyz123").is_none());
}

// ========================================================================
// Discovery
// ========================================================================

#[test]
fn test_missing_directory_is_empty() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    assert!(discover(&missing).is_empty());
    assert!(registry_for(&missing).create_highlighter("c").is_none());
}

#[test]
fn test_discover_ignores_other_files_and_sorts_by_name() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b.yaml", "name: B\nextensions: [b]\n");
    write(dir.path(), "a.toml", "name = \"A\"\nextensions = [\"a\"]\n");
    write(dir.path(), "notes.txt", "name: Notes\n");
    fs::create_dir(dir.path().join("sub.yaml")).unwrap();

    let sources = discover(dir.path());
    let origins: Vec<_> = sources
        .iter()
        .map(|s| match &s.origin {
            SourceOrigin::File(path) => path.file_name().unwrap().to_string_lossy().into_owned(),
            SourceOrigin::Bundled(id) => id.to_string(),
        })
        .collect();
    assert_eq!(origins, vec!["a.toml", "b.yaml"]);
}

#[test]
fn test_bad_source_is_skipped() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a_broken.yaml", "keywords: [unclosed\n");
    write(dir.path(), "b_wrong_shape.yaml", "keywords: 42\nextensions: [c]\n");
    write(dir.path(), "c.yaml", C_RULES);

    let registry = registry_for(dir.path());
    assert_eq!(registry.sources().len(), 1);

    let highlighter = registry.create_highlighter("c").unwrap();
    assert_eq!(highlighter.language(), "C");
    assert_eq!(highlighter.rule_set().len(), 1);
}

#[test]
fn test_bad_rules_are_skipped_within_source() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "mixed.yaml",
        r##"
keywords:
  good:
    - regex: "\\bok\\b"
      color: green
  bad:
    - regex: "[z-a]"
      color: green
    - regex: "\\bfine\\b"
      color: "#12345z"
extensions: [mix]
"##,
    );
    let registry = registry_for(dir.path());
    let highlighter = registry.create_highlighter("mix").unwrap();
    assert_eq!(highlighter.rule_set().len(), 1);
    assert_eq!(highlighter.rule_set().rules()[0].as_str(), r"\bok\b");
}

#[test]
fn test_bad_category_keeps_file() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "c.yaml",
        r##"
keywords:
  types: {regex: "\\bint\\b", color: red}
  comments:
    - regex: "//.*"
      color: gray
extensions: [c]
"##,
    );
    let registry = registry_for(dir.path());
    let highlighter = registry.create_highlighter("c").unwrap();
    assert_eq!(highlighter.rule_set().len(), 1);
    let gray = Style::fg(Color::rgb(128, 128, 128));
    assert_eq!(
        highlighter.spans("x; // int"),
        vec![StyledSpan::new(3, 6, gray)]
    );
}

// ========================================================================
// Search order
// ========================================================================

#[test]
fn test_alphabetical_first_claim_wins_within_directory() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "z_late.yaml", "name: Late\nextensions: [c]\n");
    write(dir.path(), "a_early.yaml", "name: Early\nextensions: [C]\n");

    let registry = registry_for(dir.path());
    assert_eq!(registry.create_highlighter("c").unwrap().language(), "Early");
}

#[test]
fn test_override_shadows_bundled() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "mine.yaml", "name: My Go\nextensions: [go]\n");

    let registry = SyntaxRegistry::new(SearchPath::bundled_only().with_override(dir.path()));
    assert_eq!(registry.create_highlighter("go").unwrap().language(), "My Go");
    // Bundled still answers for what the override doesn't claim
    assert_eq!(registry.create_highlighter("rs").unwrap().language(), "Rust");
}

#[test]
fn test_sources_load_once() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "c.yaml", C_RULES);
    let registry = registry_for(dir.path());
    assert!(registry.create_highlighter("c").is_some());

    // Files are read on first use only
    fs::remove_file(dir.path().join("c.yaml")).unwrap();
    assert!(registry.create_highlighter("c").is_some());
}

#[test]
fn test_registry_shared_across_threads() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "c.yaml", C_RULES);
    let registry = registry_for(dir.path());

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let highlighter = registry.create_highlighter("c").unwrap();
                assert_eq!(highlighter.spans("int int").len(), 2);
            });
        }
    });
}

// ========================================================================
// Documents
// ========================================================================

#[test]
fn test_switching_files_replaces_highlighter() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "c.yaml", C_RULES);
    let registry = registry_for(dir.path());

    let mut doc = Document::open("int main;", "c", &registry);
    assert!(!doc.block_format(0).unwrap().is_plain());

    doc = Document::open("int main;", "md", &registry);
    assert!(doc.highlighter().is_none());
    assert!(doc.block_format(0).unwrap().is_plain());
}
