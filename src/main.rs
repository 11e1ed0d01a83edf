//! parrun - launcher for .par application bundles
//!
//! A bundle is a zip archive holding a manifest (`par.json`), an entry script and optional
//! dependency lists (`apt.txt`, `requirements.txt`). `parrun run` extracts it, installs what
//! it declares and runs the entry script.

use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;

mod archive;
mod cli;
mod commands;
mod config;
mod confirm;
mod context;
mod deps;
mod error;
mod hash;
mod launcher;
mod manifest;
mod pipeline;
mod process;
mod progress;
mod temp;
mod ui;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};
use error::ParError;

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "warn,parrun=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report(err: &ParError) {
    eprintln!("Error: {err}");
    if let Some(help) = err.help() {
        eprintln!("  help: {help}");
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(cli.config, args),
        Commands::Show(args) => commands::show::run(args),
        Commands::Clean(args) => commands::clean::run(cli.config, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        tracing::debug!(kind = %e.kind(), "command failed");
        report(&e);
        std::process::exit(1);
    }
}
