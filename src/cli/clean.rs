use clap::Parser;
use std::path::PathBuf;

/// Arguments for the clean command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Remove kept extraction directories:\n    parrun clean\n\n\
                  Preview what would be removed:\n    parrun clean --dry-run\n\n\
                  Clean a custom extraction directory:\n    parrun clean --extract-dir /var/tmp/parrun")]
pub struct CleanArgs {
    /// Directory in which extraction directories were created
    #[arg(long, env = "PARRUN_EXTRACT_DIR")]
    pub extract_dir: Option<PathBuf>,

    /// Only list what would be removed
    #[arg(long)]
    pub dry_run: bool,
}
