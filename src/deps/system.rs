//! System package installation (apt.txt)
//!
//! Best effort: a failing package manager is reported, never fatal.

use std::path::Path;

use crate::error::{self, Result};
use crate::process::{CommandRunner, Invocation};

use super::SystemInstall;

/// Read a package list: one name per line, blank lines and `#` comments ignored
pub fn read_package_list(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| error::fs::read_failed(path.display().to_string(), e.to_string()))?;
    Ok(parse_package_list(&content))
}

/// One entry per line; also used for `requirements.txt` listings
pub fn parse_package_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .collect()
}

/// The package manager invocation for `packages`
pub fn install_invocation(command: &[String], packages: &[String]) -> Option<Invocation> {
    Invocation::from_command_line(command)
        .map(|invocation| invocation.args(packages.iter().cloned()))
}

/// Run the package manager once with every declared package
pub fn install(
    runner: &dyn CommandRunner,
    command: &[String],
    packages: &[String],
) -> SystemInstall {
    let Some(invocation) = install_invocation(command, packages) else {
        return SystemInstall::Failed {
            packages: packages.to_vec(),
            reason: "no package manager configured".to_string(),
        };
    };

    tracing::info!(command = %invocation, "installing system packages");
    let reason = match runner.run(&invocation) {
        Ok(exit) if exit.success() => {
            return SystemInstall::Installed {
                packages: packages.to_vec(),
            };
        }
        Ok(exit) => format!("{} exited with {exit}", invocation.program.display()),
        Err(e) => format!("failed to start {}: {e}", invocation.program.display()),
    };

    tracing::warn!(%reason, "system package installation failed, continuing");
    SystemInstall::Failed {
        packages: packages.to_vec(),
        reason,
    }
}
