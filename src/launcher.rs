//! Entry script launch
//!
//! Runs `<interpreter> <entry script>` with the extraction directory as working directory and
//! waits for it to finish.

use std::path::{Component, Path, PathBuf};

use crate::context::ExecutionContext;
use crate::error::{self, Result};
use crate::manifest::Manifest;
use crate::process::{CommandRunner, Invocation};

/// A finished entry script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryExit {
    pub script: PathBuf,
    pub code: i32,
}

/// Resolve the manifest's entry point inside `working_dir`.
///
/// Absolute entry points, entry points that leave the directory and anything that is not an
/// existing regular file are all reported as not found.
pub fn resolve_entry(working_dir: &Path, entry_point: &str) -> Result<PathBuf> {
    let relative = Path::new(entry_point);
    let stays_inside = !entry_point.is_empty()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !stays_inside {
        tracing::debug!(entry_point, "entry point is not a relative path inside the bundle");
        return Err(error::entry::not_found(entry_point));
    }

    let script = working_dir.join(relative);
    if !script.is_file() {
        return Err(error::entry::not_found(entry_point));
    }

    // Symlinks inside the bundle may still point elsewhere
    let root = dunce::canonicalize(working_dir)?;
    let resolved = dunce::canonicalize(&script)?;
    if !resolved.starts_with(&root) {
        return Err(error::entry::not_found(entry_point));
    }

    Ok(script)
}

/// Launch the entry script and wait for it
pub fn launch(
    runner: &dyn CommandRunner,
    context: &ExecutionContext,
    manifest: &Manifest,
) -> Result<EntryExit> {
    let script = resolve_entry(&context.working_dir, &manifest.entry_point)?;

    let invocation = Invocation::new(&context.interpreter)
        .arg(Invocation::path_arg(&script))
        .current_dir(&context.working_dir);
    tracing::info!(command = %invocation, "launching entry script");

    let exit = runner
        .run(&invocation)
        .map_err(|e| error::entry::launch_failed(&manifest.entry_point, e.to_string()))?;

    match exit.code {
        Some(0) => Ok(EntryExit { script, code: 0 }),
        code => Err(error::entry::failed(&manifest.entry_point, code)),
    }
}
