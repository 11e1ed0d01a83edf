//! Error types and handling for parrun
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`archive`]: Bundle archive errors
//! - [`manifest`]: Manifest errors
//! - [`deps`]: Dependency installation errors
//! - [`entry`]: Entry script errors
//! - [`config`]: Launcher configuration errors
//! - [`fs`]: File system errors

pub mod archive;
pub mod config;
pub mod deps;
pub mod entry;
pub mod fs;
pub mod manifest;

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for parrun operations
#[derive(Error, Diagnostic, Debug)]
pub enum ParError {
    // Archive errors
    #[error("Bundle archive not found: {path}")]
    #[diagnostic(
        code(parrun::archive::not_found),
        help("Check that the path points to an existing .par file")
    )]
    ArchiveNotFound { path: String },

    #[error("Failed to unpack bundle archive {path}: {reason}")]
    #[diagnostic(
        code(parrun::archive::corrupt),
        help("The file is not a readable zip archive")
    )]
    ArchiveCorrupt { path: String, reason: String },

    #[error("Unsafe entry in bundle archive: {entry}")]
    #[diagnostic(
        code(parrun::archive::unsafe_entry),
        help("Bundle entries must be relative paths that stay inside the bundle")
    )]
    ArchiveUnsafeEntry { entry: String },

    // Manifest errors
    #[error("Invalid manifest {path}: {reason}")]
    #[diagnostic(
        code(parrun::manifest::invalid),
        help("par.json must be a JSON object with optional 'entry_point' (string) and 'sudo' (boolean)")
    )]
    ManifestInvalid { path: String, reason: String },

    // Dependency errors
    #[error("Aborted by user")]
    #[diagnostic(
        code(parrun::deps::user_aborted),
        help("The bundle needs elevated privileges to install system packages. Re-run with --yes to approve")
    )]
    UserAborted,

    #[error("Failed to install Python dependencies: {reason}")]
    #[diagnostic(
        code(parrun::deps::install_failed),
        help("Both the direct install and the isolated environment install failed")
    )]
    DependencyInstallFailed { reason: String },

    // Entry errors
    #[error("Entry script not found: {entry}")]
    #[diagnostic(
        code(parrun::entry::not_found),
        help("Set 'entry_point' in par.json to a script inside the bundle")
    )]
    EntryNotFound { entry: String },

    #[error("Failed to start entry script {entry}: {reason}")]
    #[diagnostic(code(parrun::entry::launch_failed))]
    EntryLaunchFailed { entry: String, reason: String },

    #[error("Entry script {entry} exited with {}", display_code(.code))]
    #[diagnostic(code(parrun::entry::failed))]
    EntryFailed { entry: String, code: Option<i32> },

    // Configuration errors
    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(parrun::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(parrun::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(parrun::config::invalid))]
    ConfigInvalid { message: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(parrun::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(parrun::fs::io_error))]
    IoError { message: String },
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Coarse classification of a failure, as reported to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ArchiveNotFound,
    ArchiveCorrupt,
    ManifestInvalid,
    UserAborted,
    DependencyInstallFailed,
    EntryNotFound,
    EntryFailed,
    Config,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::ArchiveNotFound => "archive not found",
            ErrorKind::ArchiveCorrupt => "archive corrupt",
            ErrorKind::ManifestInvalid => "manifest invalid",
            ErrorKind::UserAborted => "user aborted",
            ErrorKind::DependencyInstallFailed => "dependency install failed",
            ErrorKind::EntryNotFound => "entry not found",
            ErrorKind::EntryFailed => "entry failed",
            ErrorKind::Config => "configuration error",
            ErrorKind::Io => "io error",
        };
        f.write_str(name)
    }
}

impl ParError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParError::ArchiveNotFound { .. } => ErrorKind::ArchiveNotFound,
            ParError::ArchiveCorrupt { .. } | ParError::ArchiveUnsafeEntry { .. } => {
                ErrorKind::ArchiveCorrupt
            }
            ParError::ManifestInvalid { .. } => ErrorKind::ManifestInvalid,
            ParError::UserAborted => ErrorKind::UserAborted,
            ParError::DependencyInstallFailed { .. } => ErrorKind::DependencyInstallFailed,
            ParError::EntryNotFound { .. } => ErrorKind::EntryNotFound,
            ParError::EntryLaunchFailed { .. } | ParError::EntryFailed { .. } => {
                ErrorKind::EntryFailed
            }
            ParError::ConfigReadFailed { .. }
            | ParError::ConfigParseFailed { .. }
            | ParError::ConfigInvalid { .. } => ErrorKind::Config,
            ParError::FileReadFailed { .. } | ParError::IoError { .. } => ErrorKind::Io,
        }
    }
}

impl From<std::io::Error> for ParError {
    fn from(err: std::io::Error) -> Self {
        ParError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for ParError {
    fn from(err: inquire::InquireError) -> Self {
        ParError::IoError {
            message: format!("Failed to read confirmation: {err}"),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, ParError>;
