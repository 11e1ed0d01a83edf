//! Test fixtures shared by unit tests.
//!
//! ```ignore
//! use crate::test_fixtures::{create_temp_dir, write_bundle};
//!
//! let temp = create_temp_dir();
//! let bundle = temp.path().join("app.par");
//! write_bundle(&bundle, &[("main.py", b"print('hi')\n")]);
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new_in(crate::temp::extraction_base(None)).expect("Failed to create temp directory")
}

/// Write a zip bundle with the given `(name, contents)` entries.
///
/// # Panics
///
/// Panics if the archive cannot be written.
pub fn write_bundle(path: &Path, entries: &[(&str, &[u8])]) {
    let entries: Vec<(&str, &[u8], u32)> = entries
        .iter()
        .map(|&(name, data)| (name, data, 0o644))
        .collect();
    write_bundle_with_modes(path, &entries);
}

/// Write a zip bundle whose directory entries `dirs` precede the file entries.
///
/// # Panics
///
/// Panics if the archive cannot be written.
pub fn write_bundle_with_dirs(path: &Path, dirs: &[&str], files: &[(&str, &[u8])]) {
    let file = File::create(path).expect("Failed to create bundle file");
    let mut writer = ZipWriter::new(file);
    for &name in dirs {
        writer
            .add_directory(name, SimpleFileOptions::default())
            .expect("Failed to add directory entry");
    }
    for &(name, data) in files {
        writer
            .start_file(name, SimpleFileOptions::default().unix_permissions(0o644))
            .expect("Failed to start zip entry");
        writer.write_all(data).expect("Failed to write zip entry");
    }
    writer.finish().expect("Failed to finish bundle");
}

/// Write a zip bundle with explicit unix permissions per entry.
///
/// # Panics
///
/// Panics if the archive cannot be written.
pub fn write_bundle_with_modes(path: &Path, entries: &[(&str, &[u8], u32)]) {
    let file = File::create(path).expect("Failed to create bundle file");
    let mut writer = ZipWriter::new(file);
    for &(name, data, mode) in entries {
        let options = SimpleFileOptions::default().unix_permissions(mode);
        writer
            .start_file(name, options)
            .expect("Failed to start zip entry");
        writer.write_all(data).expect("Failed to write zip entry");
    }
    writer.finish().expect("Failed to finish bundle");
}
