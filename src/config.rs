//! Run configuration for the conversion pipeline.
//!
//! Every invocation runs the same pipeline over one [`Config`], whether the
//! values came from command-line flags or from a `code2pdf.toml` file.

use crate::cli::Cli;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root directory to scan for source files
    pub path: PathBuf,

    /// Language name looked up in the language table
    pub language: String,

    /// Base name of the generated .tex/.pdf files
    pub output: String,

    pub title: Option<String>,
    pub author: Option<String>,

    pub landscape: bool,
    pub line_numbering: bool,

    /// Syntax highlighting theme name
    pub theme: String,

    /// Globs of files to drop from discovery
    pub excludes: Vec<String>,

    /// TeX engine binary to invoke
    pub engine: String,

    /// Keep the intermediate .tex and auxiliary files after compilation
    pub keep_tex: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            path: PathBuf::from("."),
            language: "fortran".to_string(),
            output: "code".to_string(),
            title: None,
            author: None,
            landscape: false,
            line_numbering: false,
            theme: "InspiredGitHub".to_string(),
            excludes: Vec::new(),
            engine: "pdflatex".to_string(),
            keep_tex: false,
        }
    }
}

impl Config {
    /// Build a configuration from parsed command-line arguments.
    ///
    /// When `--config` was given the whole configuration is loaded from that
    /// file and the remaining flags are ignored (clap already rejects the
    /// combination of `--config` with a positional path).
    pub fn from_cli(cli: Cli) -> Result<Config> {
        if let Some(config_path) = &cli.config {
            return Config::load(config_path);
        }

        let path = cli
            .path
            .ok_or_else(|| anyhow!("A root path is required when no --config file is given"))?;

        Ok(Config {
            path,
            language: cli.language,
            output: cli.output,
            title: cli.title,
            author: cli.author,
            landscape: cli.landscape,
            line_numbering: cli.line_numbering,
            theme: cli.theme,
            excludes: cli.excludes,
            engine: cli.engine,
            keep_tex: cli.keep_tex,
        })
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load {} contents", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }
}
