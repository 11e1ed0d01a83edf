//! Common test utilities for parrun integration tests

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// A scratch directory holding bundles, config and extraction directories for one test
pub struct TestWorkspace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = dunce::canonicalize(temp.path()).expect("Failed to canonicalize temp dir");
        Self { temp, path }
    }

    /// Write a file in workspace
    #[allow(dead_code)]
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// Read a file from workspace
    #[allow(dead_code)]
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Write a `.par` bundle with the given `(name, contents)` entries
    pub fn write_bundle(&self, name: &str, entries: &[(&str, &str)]) -> PathBuf {
        let bundle_path = self.path.join(name);
        let file = File::create(&bundle_path).expect("Failed to create bundle");
        let mut writer = ZipWriter::new(file);
        for (entry, content) in entries {
            writer
                .start_file(*entry, SimpleFileOptions::default().unix_permissions(0o644))
                .expect("Failed to start zip entry");
            writer
                .write_all(content.as_bytes())
                .expect("Failed to write zip entry");
        }
        writer.finish().expect("Failed to finish bundle");
        bundle_path
    }

    /// Directory the binary extracts into during tests
    pub fn extract_dir(&self) -> PathBuf {
        self.path.join("extract")
    }

    /// Config file location used by [`Self::parrun_cmd`]; absent unless written
    pub fn config_path(&self) -> PathBuf {
        self.path.join("config.yaml")
    }

    /// Write the launcher config file
    #[allow(dead_code)]
    pub fn write_config(&self, content: &str) {
        std::fs::write(self.config_path(), content).expect("Failed to write config");
    }

    /// Extraction directories currently on disk
    #[allow(dead_code)]
    pub fn par_dirs(&self) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(self.extract_dir()) else {
            return Vec::new();
        };
        let mut dirs: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("par_"))
            })
            .collect();
        dirs.sort();
        dirs
    }

    /// The parrun binary, isolated from the user's config and environment
    #[allow(deprecated)]
    pub fn parrun_cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("parrun").expect("parrun binary");
        cmd.current_dir(&self.path)
            .env("PARRUN_CONFIG", self.config_path())
            .env("PARRUN_EXTRACT_DIR", self.extract_dir())
            .env_remove("PARRUN_INTERPRETER")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_creation() {
        let workspace = TestWorkspace::new();
        assert!(workspace.path.exists());
        assert!(workspace.par_dirs().is_empty());
    }

    #[test]
    fn test_write_bundle() {
        let workspace = TestWorkspace::new();
        let bundle = workspace.write_bundle("app.par", &[("main.py", "print(1)\n")]);

        let archive = zip::ZipArchive::new(File::open(bundle).unwrap()).unwrap();
        assert_eq!(archive.len(), 1);
    }
}
