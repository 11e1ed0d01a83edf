//! Execution context threaded from dependency installation to entry launch

use std::path::{Path, PathBuf};

/// The interpreter and working directory used to run an entry script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    pub interpreter: PathBuf,
    pub working_dir: PathBuf,
}

impl ExecutionContext {
    pub fn new(interpreter: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            working_dir: working_dir.into(),
        }
    }

    /// Whether the interpreter lives inside `dir` (i.e. an isolated environment was selected)
    pub fn interpreter_within(&self, dir: &Path) -> bool {
        self.interpreter.starts_with(dir)
    }
}
