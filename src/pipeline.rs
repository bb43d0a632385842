//! The one pipeline every invocation runs.
//!
//! Discover, assemble (highlighting as we go), compile, then annotate. Each
//! stage consumes the immutable output of the one before it; any failure
//! aborts the run.

use crate::config::Config;
use crate::highlight::Highlighter;
use crate::{assemble, compile, discover, language, outline};
use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

pub struct PipelineReport {
    pub pdf_path: PathBuf,
    pub files: usize,
    pub routines: usize,
}

pub fn run(config: &Config) -> Result<PipelineReport> {
    let language = language::lookup(&config.language)
        .ok_or_else(|| anyhow!("I don't know how to deal with `{}` code", config.language))?;

    println!(
        "Looking for {} code in {}",
        language.name,
        config.path.display()
    );
    let files = discover::find_source_files(&config.path, language, &config.excludes)
        .with_context(|| format!("Failed to scan {}", config.path.display()))?;
    println!("Found {} source files", files.len());

    let highlighter = Highlighter::new(&config.theme)?;
    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("can parse progress style")
            .progress_chars("#>-"),
    );
    progress.set_message("Highlighting...");
    let tex = assemble::assemble(config, &files, &highlighter, &progress)
        .with_context(|| "Failed to assemble the document")?;
    progress.finish_and_clear();

    let tex_path = PathBuf::from(format!("{}.tex", config.output));
    std::fs::write(&tex_path, tex)
        .with_context(|| format!("Failed to write {}", tex_path.display()))?;

    println!("Compiling {}...", tex_path.display());
    let pdf_path = compile::compile(&config.engine, &tex_path)
        .with_context(|| "Failed to compile the document")?;

    println!("Adding routine bookmarks...");
    let stats = outline::annotate(&pdf_path, language)
        .with_context(|| format!("Failed to annotate {}", pdf_path.display()))?;
    println!(
        "Bookmarked {} file sections and {} routines",
        stats.parents, stats.routines
    );

    if !config.keep_tex {
        clean_auxiliary_files(&tex_path);
    }

    Ok(PipelineReport {
        pdf_path,
        files: files.len(),
        routines: stats.routines,
    })
}

/// Remove the intermediate .tex file and the droppings the TeX engine leaves
/// beside it. Failures here don't matter; the PDF is already written.
fn clean_auxiliary_files(tex_path: &Path) {
    for extension in ["tex", "aux", "log", "out", "toc"] {
        let _ = std::fs::remove_file(tex_path.with_extension(extension));
    }
}
