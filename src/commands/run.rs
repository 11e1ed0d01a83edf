//! Run command implementation
//!
//! Runs the pipeline through the background invocation point and waits for its single
//! outcome.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc;

use crate::cli::RunArgs;
use crate::config::{LauncherConfig, Overrides};
use crate::confirm::{Confirmer, ConsoleConfirmer, Decision};
use crate::error::{self, Result};
use crate::pipeline::{self, Outcome, Pipeline};
use crate::ui::display;

pub fn run(config_path: Option<PathBuf>, args: RunArgs) -> Result<()> {
    let config = LauncherConfig::load(config_path.as_deref())?.with_overrides(Overrides {
        interpreter: args.interpreter,
        extraction_dir: args.extract_dir,
        keep_extracted: args.keep,
    });
    config.validate()?;

    let pipeline = Pipeline::new(config)
        .with_confirmer(select_confirmer(args.yes))
        .with_progress(true);

    let (tx, rx) = mpsc::channel();
    let handle = pipeline::spawn(pipeline, args.bundle, move |outcome| {
        // The receiver only goes away if the command itself has already failed
        let _ = tx.send(outcome);
    })?;

    let outcome = rx
        .recv()
        .map_err(|_| error::fs::io_error("Pipeline ended without reporting an outcome"))?;
    if handle.join().is_err() {
        tracing::warn!("pipeline thread panicked after reporting its outcome");
    }

    tracing::debug!(
        success = outcome.is_success(),
        kind = ?outcome.kind(),
        "pipeline finished"
    );
    match outcome {
        Outcome::Succeeded(summary) => {
            display::display_run_summary(&summary);
            Ok(())
        }
        Outcome::Failed { message, error, .. } => {
            tracing::debug!(%message, "bundle run failed");
            Err(error)
        }
    }
}

fn select_confirmer(yes: bool) -> Arc<dyn Confirmer> {
    if yes {
        return Arc::new(Decision(true));
    }
    if console::user_attended() && std::io::stdin().is_terminal() {
        Arc::new(ConsoleConfirmer)
    } else {
        tracing::debug!("no interactive terminal, privileged installs will be declined");
        Arc::new(Decision(false))
    }
}
