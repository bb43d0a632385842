use anyhow::Result;
use cli::Cli;
use config::Config;
use std::process::ExitCode;

mod assemble;
mod cli;
mod compile;
mod config;
mod discover;
mod highlight;
mod language;
mod outline;
mod pipeline;

fn main() -> ExitCode {
    env_logger::init();

    if let Err(e) = try_main() {
        eprintln!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();
    let config = Config::from_cli(cli)?;

    let report = pipeline::run(&config)?;

    println!();
    println!("  PDF: {}", report.pdf_path.display());
    println!(
        "  {} source files, {} routine bookmarks",
        report.files, report.routines
    );

    Ok(())
}
