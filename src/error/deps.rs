//! Dependency installation errors

use super::ParError;

/// Creates a dependency install failed error
pub fn install_failed(reason: impl Into<String>) -> ParError {
    ParError::DependencyInstallFailed {
        reason: reason.into(),
    }
}
