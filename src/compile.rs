//! Invoking the external TeX engine.
//!
//! The engine is a blocking subprocess; a non-zero exit on either pass aborts
//! the pipeline before any PDF post-processing, since a half-built document
//! must not be handed to the page locator.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Compile `tex_path` into a PDF next to it and return the PDF path.
///
/// Runs the engine twice: the first pass records the outline entries in the
/// `.out` file, the second pass embeds them in the PDF.
pub fn compile(engine: &str, tex_path: &Path) -> Result<PathBuf> {
    let workdir = tex_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = tex_path
        .file_name()
        .ok_or_else(|| anyhow!("{} has no file name", tex_path.display()))?;

    for pass in 1..=2 {
        log::info!("{engine} pass {pass} over {}", tex_path.display());
        let output = Command::new(engine)
            .arg("-interaction=nonstopmode")
            .arg("-halt-on-error")
            .arg(file_name)
            .current_dir(workdir)
            .output()
            .with_context(|| format!("Failed to launch `{engine}`; is it on your PATH?"))?;

        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let lines: Vec<&str> = stdout.lines().collect();
            let tail = lines[lines.len().saturating_sub(20)..].join("\n");
            return Err(anyhow!(
                "{engine} exited with {} on pass {pass}:\n{tail}",
                output.status
            ));
        }
    }

    Ok(tex_path.with_extension("pdf"))
}
