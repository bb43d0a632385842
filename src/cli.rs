use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// Root directory to search for source files
    #[clap(required_unless_present = "config", conflicts_with = "config")]
    pub path: Option<PathBuf>,

    /// Load the entire run configuration from a TOML file instead of flags
    #[clap(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Source language; selects the file extensions and the routine grammar
    #[clap(long, default_value = "fortran")]
    pub language: String,

    /// Number the source lines in the output
    #[clap(short = 'n', long)]
    pub line_numbering: bool,

    /// Typeset pages in landscape orientation
    #[clap(long)]
    pub landscape: bool,

    /// Base name of the generated .tex/.pdf files
    #[clap(short = 'o', long, default_value = "code")]
    pub output: String,

    /// Document title for the title page and the PDF metadata
    #[clap(long)]
    pub title: Option<String>,

    /// Document author for the title page and the PDF metadata
    #[clap(long)]
    pub author: Option<String>,

    /// Syntax highlighting theme
    #[clap(long, default_value = "InspiredGitHub")]
    pub theme: String,

    /// Glob(s) of files to exclude from discovery (may be repeated)
    #[clap(long = "exclude", value_name = "GLOB")]
    pub excludes: Vec<String>,

    /// TeX engine used to compile the document
    #[clap(long, default_value = "pdflatex")]
    pub engine: String,

    /// Keep the intermediate .tex and auxiliary files after compilation
    #[clap(long)]
    pub keep_tex: bool,
}
