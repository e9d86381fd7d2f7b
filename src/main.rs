//! syntaxkit - highlight a source file in the terminal
//!
//! Rule files are searched in `--config-dir`/`$SYNTAXKIT_CONFIG_DIR`, then
//! the user config directory, then the bundled set.

use std::env;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use crossterm::queue;
use crossterm::style::{
    Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetForegroundColor,
};

use syntaxkit::config::SearchPath;
use syntaxkit::syntax::{Document, Style, StyledSpan, SyntaxRegistry};
use syntaxkit::{Result, SyntaxError};

/// Highlight source files with regex rule files
#[derive(Parser, Debug)]
#[command(name = "syntaxkit", version, about = "Highlight source files with regex rule files")]
struct CliArgs {
    /// File to highlight
    #[arg(value_name = "FILE", required_unless_present = "list")]
    file: Option<PathBuf>,

    /// Directory of rule files, searched before the user and bundled ones
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Highlight as if the file had this extension
    #[arg(long, value_name = "EXT")]
    ext: Option<String>,

    /// Show line numbers
    #[arg(short = 'n', long)]
    line_numbers: bool,

    /// Print the spans of each line instead of styled text
    #[arg(long)]
    spans: bool,

    /// List the available languages and exit
    #[arg(long)]
    list: bool,

    /// When to emit terminal colors
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn enabled(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => io::stdout().is_terminal() && env::var_os("NO_COLOR").is_none(),
        }
    }
}

fn main() {
    let args = CliArgs::parse();
    syntaxkit::logging::init();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<()> {
    let mut search_path = SearchPath::from_env();
    if let Some(dir) = &args.config_dir {
        search_path = search_path.with_override(dir.clone());
    }
    let registry = SyntaxRegistry::new(search_path);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.list {
        return list_languages(&registry, &mut out);
    }

    let Some(path) = args.file.as_ref() else {
        return Ok(());
    };
    let text = fs::read_to_string(path).map_err(|source| SyntaxError::Read {
        path: path.clone(),
        source,
    })?;

    let ext = args
        .ext
        .clone()
        .or_else(|| path.extension().and_then(|e| e.to_str()).map(str::to_string))
        .unwrap_or_default();
    let mut doc = Document::open(&text, &ext, &registry);
    if !doc.is_highlighted() {
        tracing::info!("No highlighter for {}, showing plain text", path.display());
    }

    if args.spans {
        print_spans(&doc, &mut out)?;
    } else {
        render(&mut doc, &mut out, args.line_numbers, args.color.enabled())?;
    }
    out.flush()?;
    Ok(())
}

fn list_languages(registry: &SyntaxRegistry, out: &mut impl Write) -> Result<()> {
    for lang in registry.languages() {
        writeln!(
            out,
            "{:<12} {:<28} {}",
            lang.name,
            lang.extensions.join(", "),
            lang.origin
        )?;
    }
    Ok(())
}

/// One line per span: `line:offset+len style`, in the order rules emit them
fn print_spans(doc: &Document, out: &mut impl Write) -> Result<()> {
    let Some(highlighter) = doc.highlighter() else {
        return Ok(());
    };
    for idx in 0..doc.line_count() {
        let line = doc.line(idx).unwrap_or_default();
        for span in highlighter.spans(line) {
            writeln!(out, "{}:{}+{} {}", idx + 1, span.start, span.len, span.style)?;
        }
    }
    Ok(())
}

fn render(doc: &mut Document, out: &mut impl Write, line_numbers: bool, color: bool) -> Result<()> {
    let gutter_width = doc.line_count().to_string().len();

    for idx in 0..doc.line_count() {
        if line_numbers {
            if color {
                queue!(out, SetAttribute(Attribute::Dim))?;
            }
            queue!(out, Print(format!("{:>width$} ", idx + 1, width = gutter_width)))?;
            if color {
                queue!(out, SetAttribute(Attribute::Reset))?;
            }
        }

        let line = doc.line(idx).unwrap_or_default().to_string();
        let runs = if color {
            doc.block_format(idx).map(|f| f.runs()).unwrap_or_default()
        } else {
            Vec::new()
        };
        write_line(out, &line, &runs)?;
    }
    Ok(())
}

/// Write a line, switching styles at each run boundary
fn write_line(out: &mut impl Write, line: &str, runs: &[StyledSpan]) -> Result<()> {
    let mut pos = 0;
    for run in runs {
        if run.start > pos {
            queue!(out, Print(slice(line, pos, run.start)))?;
        }
        apply_style(out, &run.style)?;
        queue!(
            out,
            Print(slice(line, run.start, run.end())),
            SetAttribute(Attribute::Reset),
            ResetColor
        )?;
        pos = run.end();
    }
    if pos < line.len() {
        queue!(out, Print(slice(line, pos, line.len())))?;
    }
    queue!(out, Print("\n"))?;
    Ok(())
}

fn apply_style(out: &mut impl Write, style: &Style) -> Result<()> {
    let fg = TermColor::Rgb {
        r: style.fg.r,
        g: style.fg.g,
        b: style.fg.b,
    };
    queue!(out, SetForegroundColor(fg))?;
    if style.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.italic {
        queue!(out, SetAttribute(Attribute::Italic))?;
    }
    Ok(())
}

/// Runs always fall on char boundaries; anything else prints nothing
fn slice(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or_default()
}
