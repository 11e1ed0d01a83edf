use clap::Parser;
use std::path::PathBuf;

/// Arguments for the run command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Run a bundle:\n    parrun run app.par\n\n\
                  Approve privileged system package installs without prompting:\n    parrun run app.par --yes\n\n\
                  Use a specific interpreter:\n    parrun run app.par --interpreter /usr/bin/python3.12\n\n\
                  Keep the extracted files for inspection:\n    parrun run app.par --keep --extract-dir /var/tmp/parrun")]
pub struct RunArgs {
    /// Bundle archive (.par) to run
    pub bundle: PathBuf,

    /// Approve privileged system package installs without prompting
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Keep the extraction directory after the run
    #[arg(long)]
    pub keep: bool,

    /// Interpreter used to install requirements and run the entry script
    #[arg(long, env = "PARRUN_INTERPRETER")]
    pub interpreter: Option<PathBuf>,

    /// Directory in which extraction directories are created
    #[arg(long, env = "PARRUN_EXTRACT_DIR")]
    pub extract_dir: Option<PathBuf>,
}
