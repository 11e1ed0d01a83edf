//! Confirmation of elevated-privilege installs
//!
//! The dependency installer never prompts on its own; it asks a [`Confirmer`] supplied by
//! the caller. The CLI passes [`ConsoleConfirmer`] or, with `--yes`, a pre-approved
//! [`Decision`].

use inquire::{Confirm, InquireError};

use crate::error::Result;

/// What the user is asked to approve
#[derive(Debug, Clone)]
pub struct PrivilegeRequest {
    /// System packages that will be installed
    pub packages: Vec<String>,
    /// Rendered package manager command line
    pub command: String,
}

/// Decides whether an elevated install may proceed
pub trait Confirmer: Send + Sync {
    /// Returns `Ok(true)` to proceed, `Ok(false)` to abort the run
    fn confirm(&self, request: &PrivilegeRequest) -> Result<bool>;
}

/// A decision made up front (e.g. `--yes`, or a non-interactive caller)
#[derive(Debug, Clone, Copy)]
pub struct Decision(pub bool);

impl Confirmer for Decision {
    fn confirm(&self, request: &PrivilegeRequest) -> Result<bool> {
        tracing::debug!(approved = self.0, command = %request.command, "pre-supplied decision");
        Ok(self.0)
    }
}

/// Interactive terminal prompt
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleConfirmer;

impl Confirmer for ConsoleConfirmer {
    fn confirm(&self, request: &PrivilegeRequest) -> Result<bool> {
        println!("\nThis bundle installs system packages with elevated privileges:");
        for package in &request.packages {
            println!("  - {package}");
        }
        println!();

        let answer = Confirm::new("This script requires sudo privileges. Proceed?")
            .with_default(false)
            .with_help_message(&format!("Will run: {}", request.command))
            .prompt();
        interpret_answer(answer)
    }
}

/// Esc, Ctrl-C and a missing terminal all count as declining
fn interpret_answer(answer: std::result::Result<bool, InquireError>) -> Result<bool> {
    match answer {
        Ok(approved) => Ok(approved),
        Err(
            InquireError::OperationCanceled
            | InquireError::OperationInterrupted
            | InquireError::NotTTY,
        ) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
