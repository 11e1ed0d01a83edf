//! Bundle archive errors

use super::ParError;

/// Creates an archive not found error
pub fn not_found(path: impl Into<String>) -> ParError {
    ParError::ArchiveNotFound { path: path.into() }
}

/// Creates an archive corrupt error
pub fn corrupt(path: impl Into<String>, reason: impl Into<String>) -> ParError {
    ParError::ArchiveCorrupt {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an unsafe entry error
pub fn unsafe_entry(entry: impl Into<String>) -> ParError {
    ParError::ArchiveUnsafeEntry {
        entry: entry.into(),
    }
}
