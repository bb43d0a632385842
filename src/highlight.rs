//! Syntax highlighting into LaTeX markup.
//!
//! The grammars are baked in at build time (syntect's defaults plus the
//! bundled Fortran grammar, see `build.rs`); themes come from syntect's
//! defaults. Highlighted spans are emitted as `\textcolor` groups that are
//! valid inside a fancyvrb `Verbatim` environment with `commandchars` set.

use anyhow::{anyhow, Context, Result};
use std::fmt::Write;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Color, FontStyle, Style, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

pub struct Highlighter {
    ss: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    pub fn new(theme_name: &str) -> Result<Highlighter> {
        let bytes: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/syntaxes.bin"));
        let (ss, _): (SyntaxSet, usize) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())
                .with_context(|| "Failed to deserialize the baked-in syntax set")?;

        let mut ts = ThemeSet::load_defaults();
        let theme = ts.themes.remove(theme_name).ok_or_else(|| {
            anyhow!(
                "Unknown syntax theme `{theme_name}` (available: {})",
                ts.themes.keys().cloned().collect::<Vec<_>>().join(", ")
            )
        })?;

        Ok(Highlighter { ss, theme })
    }

    /// The grammar for a file extension, or None when there isn't one.
    pub fn syntax_for_extension(&self, extension: &str) -> Option<&SyntaxReference> {
        self.ss.find_syntax_by_extension(extension)
    }

    /// Highlight a whole source file into LaTeX verbatim markup.
    pub fn highlight_to_latex(&self, syntax: &SyntaxReference, source: &str) -> Result<String> {
        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut out = String::with_capacity(source.len() * 2);
        for line in LinesWithEndings::from(source) {
            let regions = highlighter
                .highlight_line(line, &self.ss)
                .with_context(|| "Failed to highlight line")?;
            for (style, span) in regions {
                push_span(&mut out, style, span);
            }
        }
        Ok(out)
    }
}

fn push_span(out: &mut String, style: Style, span: &str) {
    // keep the newline outside the colour group so the Verbatim line break
    // isn't swallowed by it
    let (text, newline) = match span.strip_suffix('\n') {
        Some(text) => (text, true),
        None => (span, false),
    };

    if !text.is_empty() {
        let Color { r, g, b, .. } = style.foreground;
        let bold = style.font_style.contains(FontStyle::BOLD);
        let _ = write!(out, "\\textcolor[RGB]{{{r},{g},{b}}}{{");
        if bold {
            out.push_str("\\textbf{");
        }
        escape_verbatim(out, text);
        if bold {
            out.push('}');
        }
        out.push('}');
    }

    if newline {
        out.push('\n');
    }
}

/// Escape the three characters that `commandchars=\\\{\}` makes active
/// inside a `Verbatim` environment.
fn escape_verbatim(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            c => out.push(c),
        }
    }
}
