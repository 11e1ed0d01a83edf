//! Clean command implementation
//!
//! Removes extraction directories left behind by `--keep`, `keep_extracted` or interrupted
//! runs. Only directories carrying parrun's marker file are considered, and a directory whose
//! run is still in progress is skipped.

use std::fs;
use std::path::{Path, PathBuf};

use console::Style;
use walkdir::WalkDir;

use crate::cli::CleanArgs;
use crate::config::LauncherConfig;
use crate::error::{self, Result};
use crate::temp::{self, ExtractionLock};
use crate::ui::display::format_size;

/// A leftover extraction directory
#[derive(Debug)]
struct Leftover {
    path: PathBuf,
    size: u64,
    /// A run still holds the directory's lock
    in_use: bool,
}

pub fn run(config_path: Option<PathBuf>, args: CleanArgs) -> Result<()> {
    let config = LauncherConfig::load(config_path.as_deref())?;
    let configured = args.extract_dir.or(config.extraction_dir);
    let base = temp::extraction_base(configured.as_deref());

    let leftovers = find_leftovers(&base)?;
    if leftovers.is_empty() {
        println!("No extraction directories in {}.", base.display());
        return Ok(());
    }

    for leftover in &leftovers {
        let note = if leftover.in_use {
            format!("{}, in use", format_size(leftover.size))
        } else {
            format_size(leftover.size)
        };
        println!(
            "  {} {}",
            leftover.path.display(),
            Style::new().dim().apply_to(note)
        );
    }

    let idle: Vec<&Leftover> = leftovers.iter().filter(|l| !l.in_use).collect();
    let total: u64 = idle.iter().map(|l| l.size).sum();

    if args.dry_run {
        println!(
            "Would remove {} extraction director{} ({}).",
            idle.len(),
            if idle.len() == 1 { "y" } else { "ies" },
            format_size(total)
        );
        return Ok(());
    }

    let removed = remove_leftovers(&idle)?;
    println!(
        "{} Removed {} extraction director{} ({} freed).",
        Style::new().green().bold().apply_to("✓"),
        removed,
        if removed == 1 { "y" } else { "ies" },
        format_size(total)
    );
    Ok(())
}

fn find_leftovers(base: &Path) -> Result<Vec<Leftover>> {
    if !base.is_dir() {
        return Ok(Vec::new());
    }

    let read_dir = fs::read_dir(base).map_err(|e| {
        error::fs::read_failed(base.display().to_string(), e.to_string())
    })?;

    let mut leftovers: Vec<Leftover> = read_dir
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
        .filter(|e| temp::is_extraction_dir_name(&e.file_name().to_string_lossy()))
        .map(|e| e.path())
        .filter(|path| temp::has_marker(path))
        .map(|path| {
            let in_use = ExtractionLock::try_acquire(&path)?.is_none();
            Ok(Leftover {
                size: dir_size(&path),
                path,
                in_use,
            })
        })
        .collect::<Result<_>>()?;

    leftovers.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(leftovers)
}

/// Remove idle leftovers; a directory picked up by a run since it was listed is skipped
fn remove_leftovers(leftovers: &[&Leftover]) -> Result<usize> {
    let mut removed = 0;
    for leftover in leftovers {
        let Some(lock) = ExtractionLock::try_acquire(&leftover.path)? else {
            tracing::debug!(
                path = %leftover.path.display(),
                "skipping extraction directory in use"
            );
            continue;
        };
        drop(lock);

        tracing::debug!(path = %leftover.path.display(), "removing extraction directory");
        fs::remove_dir_all(&leftover.path).map_err(|e| {
            error::fs::io_error(format!(
                "Failed to remove {}: {e}",
                leftover.path.display()
            ))
        })?;
        removed += 1;
    }
    Ok(removed)
}

/// Total size of regular files under `path`
fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}
