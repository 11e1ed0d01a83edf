//! File system errors

use super::ParError;

/// Creates a file read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> ParError {
    ParError::FileReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an IO error
pub fn io_error(message: impl Into<String>) -> ParError {
    ParError::IoError {
        message: message.into(),
    }
}
