//! Version command implementation

use crate::config::{self, LauncherConfig};
use crate::error::Result;
use crate::temp;

/// Run version command
pub fn run() -> Result<()> {
    println!("parrun {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build info:");
    println!("  Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    println!("  Profile: {}", build_profile());
    println!();
    println!("Defaults:");
    println!(
        "  Interpreter: {}",
        LauncherConfig::default().interpreter.display()
    );
    println!(
        "  Config file: {}",
        config::default_config_path()
            .map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
    );
    println!(
        "  Extraction base: {}",
        temp::extraction_base(None).display()
    );

    Ok(())
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}
