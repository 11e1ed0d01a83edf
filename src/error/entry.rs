//! Entry script errors

use super::ParError;

/// Creates an entry not found error
pub fn not_found(entry: impl Into<String>) -> ParError {
    ParError::EntryNotFound {
        entry: entry.into(),
    }
}

/// Creates an entry launch failed error
pub fn launch_failed(entry: impl Into<String>, reason: impl Into<String>) -> ParError {
    ParError::EntryLaunchFailed {
        entry: entry.into(),
        reason: reason.into(),
    }
}

/// Creates an entry failed error for a non-zero exit
pub fn failed(entry: impl Into<String>, code: Option<i32>) -> ParError {
    ParError::EntryFailed {
        entry: entry.into(),
        code,
    }
}
