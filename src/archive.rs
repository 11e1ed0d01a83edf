//! Bundle archive extraction
//!
//! A bundle is a zip archive. Each run unpacks it into a fresh `par_XXXXXX` directory under
//! the extraction base. The directory is released when the returned [`ExtractionDir`] is
//! dropped, unless it is explicitly kept. While the value is alive the directory's marker
//! file is locked, so `parrun clean` leaves it alone.
//!
//! Entry paths are validated before anything is written: absolute paths, drive prefixes and
//! `..` components are rejected, and every target must resolve inside the extraction
//! directory.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Component, Path, PathBuf};

use tempfile::TempDir;
use zip::ZipArchive;

use crate::error::{self, Result};
use crate::progress::ExtractProgress;
use crate::temp::{EXTRACTION_PREFIX, ExtractionLock};

/// An extraction directory owned by one pipeline run
#[derive(Debug)]
pub struct ExtractionDir {
    // Declared before `dir` so the lock is released before the directory is removed
    lock: ExtractionLock,
    dir: TempDir,
    /// Canonical path of `dir`, used for containment checks
    root: PathBuf,
}

impl ExtractionDir {
    fn create_in(base: &Path) -> Result<Self> {
        fs::create_dir_all(base).map_err(|e| {
            error::fs::io_error(format!(
                "Failed to create extraction base {}: {e}",
                base.display()
            ))
        })?;
        let dir = tempfile::Builder::new()
            .prefix(EXTRACTION_PREFIX)
            .tempdir_in(base)
            .map_err(|e| {
                error::fs::io_error(format!(
                    "Failed to create extraction directory in {}: {e}",
                    base.display()
                ))
            })?;
        let root = dunce::canonicalize(dir.path())?;
        let lock = ExtractionLock::acquire(&root)?;
        Ok(Self { lock, dir, root })
    }

    /// Path of the extraction directory
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Keep the directory on disk past the lifetime of this value
    pub fn keep(self) -> PathBuf {
        let Self { lock, dir, root } = self;
        drop(lock);
        let _ = dir.keep();
        root
    }

    /// Remove the directory now, reporting failures instead of ignoring them
    pub fn close(self) -> Result<()> {
        let Self { lock, dir, root } = self;
        drop(lock);
        dir.close().map_err(|e| {
            error::fs::io_error(format!("Failed to remove {}: {e}", root.display()))
        })
    }
}

/// Unpack `archive_path` into a new extraction directory under `base`.
///
/// Fails with `ArchiveNotFound` before touching the filesystem when the path is not an
/// existing file, and with `ArchiveCorrupt` when the archive cannot be read or unpacked. A
/// partially populated directory is removed on failure.
pub fn extract(
    archive_path: &Path,
    base: &Path,
    progress: &ExtractProgress,
) -> Result<ExtractionDir> {
    let display_path = archive_path.display().to_string();
    let mut archive = open(archive_path)?;

    let extraction = ExtractionDir::create_in(base)?;
    tracing::debug!(
        archive = %display_path,
        dir = %extraction.path().display(),
        entries = archive.len(),
        "extracting bundle"
    );

    progress.set_total(archive.len() as u64);
    if let Err(e) = unpack(&mut archive, extraction.path(), &display_path, progress) {
        progress.abandon();
        return Err(e);
    }
    progress.finish();

    Ok(extraction)
}

fn open(archive_path: &Path) -> Result<ZipArchive<BufReader<File>>> {
    if !archive_path.is_file() {
        return Err(error::archive::not_found(archive_path.display().to_string()));
    }
    let display_path = archive_path.display().to_string();
    let file = File::open(archive_path)
        .map_err(|e| error::archive::corrupt(&display_path, e.to_string()))?;
    ZipArchive::new(BufReader::new(file))
        .map_err(|e| error::archive::corrupt(&display_path, e.to_string()))
}

/// An archive entry as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    /// Uncompressed size in bytes
    pub size: u64,
    pub is_dir: bool,
}

/// List the entries of a bundle archive without extracting it
pub fn list_entries(archive_path: &Path) -> Result<Vec<ArchiveEntry>> {
    let display_path = archive_path.display().to_string();
    let mut archive = open(archive_path)?;

    (0..archive.len())
        .map(|index| {
            let entry = archive
                .by_index(index)
                .map_err(|e| error::archive::corrupt(&display_path, e.to_string()))?;
            Ok(ArchiveEntry {
                name: entry.name().to_string(),
                size: entry.size(),
                is_dir: entry.is_dir(),
            })
        })
        .collect()
}

/// Read a top-level text file from a bundle archive, `None` when absent
pub fn read_text_entry(archive_path: &Path, name: &str) -> Result<Option<String>> {
    let display_path = archive_path.display().to_string();
    let mut archive = open(archive_path)?;

    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(error::archive::corrupt(&display_path, e.to_string())),
    };

    let mut content = String::new();
    io::Read::read_to_string(&mut entry, &mut content)
        .map_err(|e| error::archive::corrupt(&display_path, format!("{name}: {e}")))?;
    Ok(Some(content))
}

fn unpack<R: io::Read + io::Seek>(
    archive: &mut ZipArchive<R>,
    root: &Path,
    display_path: &str,
    progress: &ExtractProgress,
) -> Result<()> {
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| error::archive::corrupt(display_path, e.to_string()))?;
        let name = entry.name().to_string();

        // Some zip tools store the archive root itself as `./`
        if entry.is_dir() && is_root_entry(&name) {
            progress.entry(&name);
            continue;
        }

        let relative = validate_entry_path(&name)?;
        let target = root.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| unpack_failed(display_path, &name, &e))?;
            ensure_within(root, &target, &name)?;
            progress.entry(&name);
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| unpack_failed(display_path, &name, &e))?;
            ensure_within(root, parent, &name)?;
        }

        let mut out = File::create(&target).map_err(|e| unpack_failed(display_path, &name, &e))?;
        io::copy(&mut entry, &mut out).map_err(|e| unpack_failed(display_path, &name, &e))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&target, fs::Permissions::from_mode(mode & 0o777))
                .map_err(|e| unpack_failed(display_path, &name, &e))?;
        }

        progress.entry(&name);
    }

    Ok(())
}

fn unpack_failed(display_path: &str, entry: &str, err: &io::Error) -> crate::error::ParError {
    error::archive::corrupt(display_path, format!("{entry}: {err}"))
}

fn is_root_entry(name: &str) -> bool {
    let mut components = Path::new(name).components().peekable();
    components.peek().is_some() && components.all(|c| c == Component::CurDir)
}

/// Validate an archive entry name and return it as a relative path.
///
/// Rejects absolute paths, drive/UNC prefixes and parent directory components.
fn validate_entry_path(name: &str) -> Result<PathBuf> {
    let path = Path::new(name);
    let mut relative = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(error::archive::unsafe_entry(name));
            }
        }
    }

    if relative.as_os_str().is_empty() {
        return Err(error::archive::unsafe_entry(name));
    }

    Ok(relative)
}

/// The canonical form of `path` must stay under `root`; catches escapes through
/// pre-existing symlinks that component checks cannot see.
fn ensure_within(root: &Path, path: &Path, name: &str) -> Result<()> {
    let canonical = dunce::canonicalize(path).map_err(|_| error::archive::unsafe_entry(name))?;
    if canonical.starts_with(root) {
        Ok(())
    } else {
        Err(error::archive::unsafe_entry(name))
    }
}
