//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - run: Run command arguments
//! - show: Show command arguments
//! - clean: Clean command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod clean;
pub mod completions;
pub mod run;
pub mod show;

pub use clean::CleanArgs;
pub use completions::CompletionsArgs;
pub use run::RunArgs;
pub use show::ShowArgs;

/// parrun - launcher for .par application bundles
///
/// Extracts a bundle, installs its dependencies and runs its entry script.
#[derive(Parser, Debug)]
#[command(
    name = "parrun",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Launcher for self-contained .par application bundles",
    long_about = "parrun unpacks a .par bundle (a zip archive with par.json, an entry script and \
                  optional apt.txt / requirements.txt), installs the declared dependencies and runs \
                  the entry script with the right interpreter.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  parrun run app.par                  \x1b[90m# Install dependencies and run\x1b[0m\n   \
                  parrun run app.par --yes            \x1b[90m# Approve sudo installs up front\x1b[0m\n   \
                  parrun run app.par --keep           \x1b[90m# Keep the extracted files\x1b[0m\n   \
                  parrun show app.par                 \x1b[90m# Inspect without running\x1b[0m\n   \
                  parrun clean                        \x1b[90m# Remove kept extraction directories\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Configuration file (defaults to <config dir>/parrun/config.yaml)
    #[arg(long, short = 'c', global = true, env = "PARRUN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract a bundle, install its dependencies and run it
    Run(RunArgs),

    /// Show bundle information without running it
    Show(ShowArgs),

    /// Remove leftover extraction directories
    Clean(CleanArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
