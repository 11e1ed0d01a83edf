//! Manifest errors

use super::ParError;

/// Creates a manifest invalid error
pub fn invalid(path: impl Into<String>, reason: impl Into<String>) -> ParError {
    ParError::ManifestInvalid {
        path: path.into(),
        reason: reason.into(),
    }
}
