//! LaTeX document assembly: one titled section per source file.
//!
//! The generated document leans on hyperref to record one outline bookmark
//! per `\section`; the bookmark post-processing later reads those back as the
//! parent entries of the routine hierarchy. Each file starts on a fresh page
//! so a section's page range never bleeds into the previous file.

use crate::config::Config;
use crate::highlight::Highlighter;
use anyhow::{anyhow, Context, Result};
use indicatif::ProgressBar;
use std::fmt::Write;
use std::path::PathBuf;

/// Assemble the complete LaTeX document for the given source files.
pub fn assemble(
    config: &Config,
    files: &[PathBuf],
    highlighter: &Highlighter,
    progress: &ProgressBar,
) -> Result<String> {
    let mut tex = preamble(config);

    for file in files {
        let basename = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        progress.set_message(basename.clone());

        let extension = file
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or_default();
        let syntax = highlighter.syntax_for_extension(extension).ok_or_else(|| {
            anyhow!(
                "No highlighting grammar for `.{extension}` (file {})",
                file.display()
            )
        })?;

        let source = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read contents of {}", file.display()))?;
        let highlighted = highlighter
            .highlight_to_latex(syntax, &source)
            .with_context(|| format!("Failed to highlight {}", file.display()))?;

        let numbers = if config.line_numbering {
            ", numbers=left"
        } else {
            ""
        };
        writeln!(tex, "\\pagebreak")?;
        writeln!(tex, "\\section{{{}}}", escape_latex(&basename))?;
        writeln!(tex, "\\begin{{Verbatim}}[commandchars=\\\\\\{{\\}}{numbers}]")?;
        tex.push_str(&highlighted);
        if !highlighted.ends_with('\n') && !highlighted.is_empty() {
            tex.push('\n');
        }
        writeln!(tex, "\\end{{Verbatim}}")?;

        progress.inc(1);
    }

    if files.is_empty() {
        // pdflatex emits no PDF at all for a bodyless document
        writeln!(tex, "\\null")?;
    }

    writeln!(tex, "\\end{{document}}")?;
    Ok(tex)
}

fn preamble(config: &Config) -> String {
    let mut tex = String::new();

    tex.push_str("\\documentclass{scrartcl}\n");
    tex.push_str("\\usepackage{fancyvrb}\n");
    tex.push_str("\\usepackage[dvipsnames]{xcolor}\n");
    if config.landscape {
        tex.push_str("\\usepackage[landscape,margin=2cm]{geometry}\n");
    } else {
        tex.push_str("\\usepackage[margin=2cm]{geometry}\n");
    }

    tex.push_str("\\usepackage{hyperref}\n");
    tex.push_str("\\hypersetup{\n");
    tex.push_str("    backref=section,\n");
    tex.push_str("    pdfpagelabels=true,\n");
    tex.push_str("    colorlinks=true,\n");
    tex.push_str("    linkcolor=RoyalBlue,\n");
    tex.push_str("    citecolor=blue,\n");
    tex.push_str("    urlcolor=blue,\n");
    tex.push_str("    frenchlinks=true,\n");
    tex.push_str("    bookmarks=true,\n");
    if let Some(title) = &config.title {
        let _ = writeln!(tex, "    pdftitle={{{}}},", escape_latex(title));
    }
    if let Some(author) = &config.author {
        let _ = writeln!(tex, "    pdfauthor={{{}}},", escape_latex(author));
    }
    tex.push_str("}\n");

    tex.push_str("\n\\begin{document}\n");

    if let Some(title) = &config.title {
        let _ = writeln!(tex, "\\title{{{}}}", escape_latex(title));
        let _ = writeln!(
            tex,
            "\\author{{{}}}",
            escape_latex(config.author.as_deref().unwrap_or_default())
        );
        tex.push_str("\\date{}\n\\maketitle\n");
    }

    tex
}

/// Escape text for use in normal LaTeX (section titles, metadata).
fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '&' | '%' | '$' | '#' | '_' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config::default()
    }

    #[test]
    fn escapes_latex_specials_in_titles() {
        assert_eq!(escape_latex("my_file.f90"), "my\\_file.f90");
        assert_eq!(escape_latex("a&b#c"), "a\\&b\\#c");
        assert_eq!(escape_latex("100%"), "100\\%");
        assert_eq!(escape_latex("x^y~z"), "x\\textasciicircum{}y\\textasciitilde{}z");
    }

    #[test]
    fn zero_files_still_yields_a_compilable_document() {
        let highlighter = Highlighter::new("InspiredGitHub").expect("default theme exists");
        let progress = ProgressBar::hidden();
        let tex = assemble(&test_config(), &[], &highlighter, &progress)
            .expect("assembly succeeds with zero files");

        assert!(tex.contains("\\begin{document}"));
        assert!(tex.contains("\\null"));
        assert!(tex.contains("\\end{document}"));
        assert!(!tex.contains("\\section"));
    }

    #[test]
    fn each_file_becomes_a_section_on_a_fresh_page() {
        let dir = tempfile::tempdir().expect("can create tempdir");
        let file = dir.path().join("solver_main.f90");
        std::fs::write(&file, "subroutine solve\nend subroutine solve\n").unwrap();

        let highlighter = Highlighter::new("InspiredGitHub").expect("default theme exists");
        let progress = ProgressBar::hidden();
        let tex = assemble(&test_config(), &[file], &highlighter, &progress)
            .expect("assembly succeeds");

        assert!(tex.contains("\\pagebreak"));
        assert!(tex.contains("\\section{solver\\_main.f90}"));
        assert!(tex.contains("\\begin{Verbatim}[commandchars=\\\\\\{\\}]"));
        assert!(tex.contains("\\end{Verbatim}"));
    }

    #[test]
    fn line_numbering_turns_on_the_verbatim_option() {
        let dir = tempfile::tempdir().expect("can create tempdir");
        let file = dir.path().join("a.f90");
        std::fs::write(&file, "end\n").unwrap();

        let mut config = test_config();
        config.line_numbering = true;
        let highlighter = Highlighter::new("InspiredGitHub").expect("default theme exists");
        let progress = ProgressBar::hidden();
        let tex = assemble(&config, &[file], &highlighter, &progress).expect("assembly succeeds");

        assert!(tex.contains(", numbers=left]"));
    }

    #[test]
    fn a_title_produces_metadata_and_a_title_page() {
        let mut config = test_config();
        config.title = Some("My Code".to_string());
        config.author = Some("Jane".to_string());
        let highlighter = Highlighter::new("InspiredGitHub").expect("default theme exists");
        let progress = ProgressBar::hidden();
        let tex = assemble(&config, &[], &highlighter, &progress).expect("assembly succeeds");

        assert!(tex.contains("pdftitle={My Code}"));
        assert!(tex.contains("\\maketitle"));
        assert!(tex.contains("\\author{Jane}"));
    }

    #[test]
    fn files_without_a_grammar_are_fatal() {
        let dir = tempfile::tempdir().expect("can create tempdir");
        let file = dir.path().join("mystery.zzz");
        std::fs::write(&file, "???").unwrap();

        let highlighter = Highlighter::new("InspiredGitHub").expect("default theme exists");
        let progress = ProgressBar::hidden();
        assert!(assemble(&test_config(), &[file], &highlighter, &progress).is_err());
    }
}
