//! Base directory for extraction directories, and the lock that marks them as ours.
//!
//! Extraction directories are never created under the current working directory, even when
//! TMPDIR is relative (e.g. TMPDIR=tmp) or the configured extraction dir is relative.
//!
//! Every extraction directory carries a [`MARKER_FILE`]. A run holds an advisory lock on it
//! until it ends, so `parrun clean` can tell finished leftovers from directories in use.

use std::env;
use std::path::{Path, PathBuf};

use fslock::LockFile;

use crate::error::{self, Result};

/// Prefix of every extraction directory name
pub const EXTRACTION_PREFIX: &str = "par_";

/// Marker and lock file written into every extraction directory
pub const MARKER_FILE: &str = ".parrun.lock";

/// Returns the directory under which extraction directories are created.
///
/// A configured directory wins when it is absolute; relative values are ignored with a warning
/// and the system temp directory is used instead.
pub fn extraction_base(configured: Option<&Path>) -> PathBuf {
    match configured {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => {
            tracing::warn!(
                path = %dir.display(),
                "ignoring relative extraction directory, using system temp directory"
            );
            system_temp_dir()
        }
        None => system_temp_dir(),
    }
}

fn system_temp_dir() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        return t;
    }

    #[cfg(windows)]
    {
        env::var("TEMP")
            .or_else(|_| env::var("TMP"))
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Windows\\Temp"))
    }
    #[cfg(not(windows))]
    {
        PathBuf::from("/tmp")
    }
}

/// Whether a directory name looks like one of ours
pub fn is_extraction_dir_name(name: &str) -> bool {
    name.strip_prefix(EXTRACTION_PREFIX)
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(char::is_alphanumeric))
}

/// Whether `dir` was created by parrun
pub fn has_marker(dir: &Path) -> bool {
    dir.join(MARKER_FILE).is_file()
}

/// Advisory lock on an extraction directory; released on drop.
///
/// The marker file itself stays in place so a kept directory is still recognised.
#[derive(Debug)]
pub struct ExtractionLock {
    lock: LockFile,
}

impl ExtractionLock {
    /// Create the marker in `dir` and lock it, waiting if another process holds it
    pub fn acquire(dir: &Path) -> Result<Self> {
        let mut lock = open_marker(dir)?;
        lock.lock().map_err(|e| lock_failed(dir, &e))?;
        Ok(Self { lock })
    }

    /// Lock `dir` unless another run holds it; `None` while it is in use
    pub fn try_acquire(dir: &Path) -> Result<Option<Self>> {
        let mut lock = open_marker(dir)?;
        if lock.try_lock().map_err(|e| lock_failed(dir, &e))? {
            Ok(Some(Self { lock }))
        } else {
            Ok(None)
        }
    }
}

impl Drop for ExtractionLock {
    fn drop(&mut self) {
        if self.lock.owns_lock() {
            let _ = self.lock.unlock();
        }
    }
}

fn open_marker(dir: &Path) -> Result<LockFile> {
    LockFile::open(&dir.join(MARKER_FILE)).map_err(|e| lock_failed(dir, &e))
}

fn lock_failed(dir: &Path, err: &impl std::fmt::Display) -> error::ParError {
    error::fs::io_error(format!("Failed to lock {}: {err}", dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::create_temp_dir;

    #[test]
    fn test_configured_absolute_dir_is_used() {
        let dir = if cfg!(windows) {
            PathBuf::from(r"C:\bundles")
        } else {
            PathBuf::from("/var/tmp/bundles")
        };
        assert_eq!(extraction_base(Some(&dir)), dir);
    }

    #[test]
    fn test_relative_dir_falls_back_to_absolute() {
        let base = extraction_base(Some(Path::new("tmp")));
        assert!(base.is_absolute());
    }

    #[test]
    fn test_default_is_absolute() {
        assert!(extraction_base(None).is_absolute());
    }

    #[test]
    fn test_extraction_dir_names() {
        assert!(is_extraction_dir_name("par_a1B2c3"));
        assert!(!is_extraction_dir_name("par_"));
        assert!(!is_extraction_dir_name("parcel"));
        assert!(!is_extraction_dir_name("par_../x"));
        assert!(!is_extraction_dir_name("other_abc"));
    }

    #[test]
    fn test_lock_writes_marker() {
        let temp = create_temp_dir();
        assert!(!has_marker(temp.path()));

        let _lock = ExtractionLock::acquire(temp.path()).unwrap();
        assert!(has_marker(temp.path()));
    }

    #[test]
    fn test_lock_is_exclusive_until_dropped() {
        let temp = create_temp_dir();

        let held = ExtractionLock::acquire(temp.path()).unwrap();
        assert!(ExtractionLock::try_acquire(temp.path()).unwrap().is_none());

        drop(held);
        assert!(ExtractionLock::try_acquire(temp.path()).unwrap().is_some());
        assert!(has_marker(temp.path()));
    }
}
