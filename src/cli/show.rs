use clap::Parser;
use std::path::PathBuf;

/// Arguments for the show command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show bundle information:\n    parrun show app.par")]
pub struct ShowArgs {
    /// Bundle archive to inspect
    pub bundle: PathBuf,
}
