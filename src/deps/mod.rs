//! Dependency installation for extracted bundles
//!
//! Two optional declaration files at the bundle root:
//! - `apt.txt`: system packages, installed best effort with the configured package manager.
//!   When the manifest sets `sudo`, the caller's [`Confirmer`] must approve first.
//! - `requirements.txt`: Python requirements. A direct pip install into the configured
//!   interpreter is tried first; if it fails, a venv is created inside the extraction
//!   directory and the requirements are installed there. Only a failure of that fallback
//!   aborts the run.
//!
//! The result is the [`ExecutionContext`] for the entry script plus an [`InstallReport`]
//! saying what happened, including a failed system install.

pub mod python;
pub mod system;

use std::path::{Path, PathBuf};

use crate::config::LauncherConfig;
use crate::confirm::{Confirmer, PrivilegeRequest};
use crate::context::ExecutionContext;
use crate::error::{self, ParError, Result};
use crate::manifest::Manifest;
use crate::process::CommandRunner;

/// System package list file
pub const SYSTEM_DEPS_FILE: &str = "apt.txt";

/// Python requirements file
pub const PYTHON_DEPS_FILE: &str = "requirements.txt";

/// Outcome of the system package step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemInstall {
    Skipped,
    Installed { packages: Vec<String> },
    Failed { packages: Vec<String>, reason: String },
}

/// Outcome of the Python requirements step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpreterInstall {
    Skipped,
    /// Installed into the configured interpreter
    Direct,
    /// Direct install failed; installed into a venv instead
    IsolatedEnvironment { venv: PathBuf },
}

/// What the dependency installer did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub system: SystemInstall,
    pub interpreter: InterpreterInstall,
}

/// Installs bundle dependencies and selects the interpreter
pub struct DependencyInstaller<'a> {
    config: &'a LauncherConfig,
    runner: &'a dyn CommandRunner,
    confirmer: &'a dyn Confirmer,
}

impl<'a> DependencyInstaller<'a> {
    pub fn new(
        config: &'a LauncherConfig,
        runner: &'a dyn CommandRunner,
        confirmer: &'a dyn Confirmer,
    ) -> Self {
        Self {
            config,
            runner,
            confirmer,
        }
    }

    /// Install dependencies declared in `bundle_dir`
    pub fn install(
        &self,
        bundle_dir: &Path,
        manifest: &Manifest,
    ) -> Result<(ExecutionContext, InstallReport)> {
        let system = self.install_system(bundle_dir, manifest)?;
        let (interpreter, interpreter_install) = self.install_python(bundle_dir)?;

        let context = ExecutionContext::new(interpreter, bundle_dir);
        let report = InstallReport {
            system,
            interpreter: interpreter_install,
        };
        Ok((context, report))
    }

    fn install_system(&self, bundle_dir: &Path, manifest: &Manifest) -> Result<SystemInstall> {
        let apt_file = bundle_dir.join(SYSTEM_DEPS_FILE);
        if !apt_file.is_file() {
            return Ok(SystemInstall::Skipped);
        }

        let packages = system::read_package_list(&apt_file)?;
        if packages.is_empty() {
            tracing::debug!("{SYSTEM_DEPS_FILE} declares no packages");
            return Ok(SystemInstall::Skipped);
        }

        if manifest.sudo {
            let command = system::install_invocation(&self.config.package_manager, &packages)
                .map(|invocation| invocation.to_string())
                .unwrap_or_default();
            let request = PrivilegeRequest {
                packages: packages.clone(),
                command,
            };
            if !self.confirmer.confirm(&request)? {
                tracing::info!("elevated install declined");
                return Err(ParError::UserAborted);
            }
        }

        Ok(system::install(
            self.runner,
            &self.config.package_manager,
            &packages,
        ))
    }

    fn install_python(&self, bundle_dir: &Path) -> Result<(PathBuf, InterpreterInstall)> {
        let interpreter = self.config.interpreter.clone();
        let requirements = bundle_dir.join(PYTHON_DEPS_FILE);
        if !requirements.is_file() {
            return Ok((interpreter, InterpreterInstall::Skipped));
        }

        let direct = python::direct_install_invocation(
            &interpreter,
            &requirements,
            self.config.break_system_packages,
            bundle_dir,
        );
        tracing::info!(command = %direct, "installing Python requirements");
        let direct_failure = match python::run_step(self.runner, &direct) {
            Ok(()) => return Ok((interpreter, InterpreterInstall::Direct)),
            Err(reason) => reason,
        };

        tracing::warn!(
            reason = %direct_failure,
            "direct install failed, falling back to an isolated environment"
        );

        let venv = bundle_dir.join(python::VENV_DIR);
        let create = python::create_venv_invocation(&interpreter, &venv, bundle_dir);
        python::run_step(self.runner, &create).map_err(error::deps::install_failed)?;

        let install = python::venv_install_invocation(&venv, &requirements, bundle_dir);
        python::run_step(self.runner, &install).map_err(error::deps::install_failed)?;

        Ok((
            python::venv_interpreter(&venv),
            InterpreterInstall::IsolatedEnvironment { venv },
        ))
    }
}
