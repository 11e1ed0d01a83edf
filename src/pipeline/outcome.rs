//! Terminal results of a pipeline run

use std::path::PathBuf;

use crate::context::ExecutionContext;
use crate::deps::InstallReport;
use crate::error::{ErrorKind, ParError, Result};
use crate::manifest::Manifest;

/// Everything a successful run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Archive that was run
    pub bundle: PathBuf,
    /// Where it was extracted
    pub extraction_dir: PathBuf,
    /// Whether the extraction directory is still on disk
    pub kept: bool,
    pub manifest: Manifest,
    pub report: InstallReport,
    pub context: ExecutionContext,
    pub entry_script: PathBuf,
    pub exit_code: i32,
}

/// The single result delivered for a run
#[derive(Debug)]
pub enum Outcome {
    Succeeded(RunSummary),
    Failed {
        kind: ErrorKind,
        /// Human readable reason
        message: String,
        /// The underlying error, for rich diagnostics
        error: ParError,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded(_))
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Succeeded(_) => None,
            Outcome::Failed { kind, .. } => Some(*kind),
        }
    }
}

impl From<Result<RunSummary>> for Outcome {
    fn from(result: Result<RunSummary>) -> Self {
        match result {
            Ok(summary) => Outcome::Succeeded(summary),
            Err(error) => Outcome::Failed {
                kind: error.kind(),
                message: error.to_string(),
                error,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error;

    #[test]
    fn test_failure_carries_kind_and_message() {
        let outcome = Outcome::from(Err::<RunSummary, _>(error::entry::not_found("main.py")));

        assert!(!outcome.is_success());
        assert_eq!(outcome.kind(), Some(ErrorKind::EntryNotFound));
        match outcome {
            Outcome::Failed { message, .. } => {
                assert_eq!(message, "Entry script not found: main.py");
            }
            Outcome::Succeeded(_) => panic!("expected failure"),
        }
    }
}
