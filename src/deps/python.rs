//! Python requirement installation (requirements.txt)
//!
//! Direct install into the configured interpreter first; when that fails, a venv inside the
//! extraction directory.

use std::path::{Path, PathBuf};

use crate::process::{CommandRunner, Invocation};

/// Directory name of the isolated environment inside the extraction directory
pub const VENV_DIR: &str = "venv";

#[cfg(windows)]
const VENV_BIN_DIR: &str = "Scripts";
#[cfg(not(windows))]
const VENV_BIN_DIR: &str = "bin";

#[cfg(windows)]
const VENV_PYTHON: &str = "python.exe";
#[cfg(not(windows))]
const VENV_PYTHON: &str = "python";

#[cfg(windows)]
const VENV_PIP: &str = "pip.exe";
#[cfg(not(windows))]
const VENV_PIP: &str = "pip";

/// Interpreter inside a venv
pub fn venv_interpreter(venv: &Path) -> PathBuf {
    venv.join(VENV_BIN_DIR).join(VENV_PYTHON)
}

/// pip inside a venv
pub fn venv_pip(venv: &Path) -> PathBuf {
    venv.join(VENV_BIN_DIR).join(VENV_PIP)
}

/// `<interpreter> -m pip install [--break-system-packages] -r <requirements>`
pub fn direct_install_invocation(
    interpreter: &Path,
    requirements: &Path,
    break_system_packages: bool,
    cwd: &Path,
) -> Invocation {
    let mut invocation = Invocation::new(interpreter).args(["-m", "pip", "install"]);
    if break_system_packages {
        invocation = invocation.arg("--break-system-packages");
    }
    invocation
        .arg("-r")
        .arg(Invocation::path_arg(requirements))
        .current_dir(cwd)
}

/// `<interpreter> -m venv <venv>`
pub fn create_venv_invocation(interpreter: &Path, venv: &Path, cwd: &Path) -> Invocation {
    Invocation::new(interpreter)
        .args(["-m", "venv"])
        .arg(Invocation::path_arg(venv))
        .current_dir(cwd)
}

/// `<venv pip> install -r <requirements>`
pub fn venv_install_invocation(venv: &Path, requirements: &Path, cwd: &Path) -> Invocation {
    Invocation::new(venv_pip(venv))
        .args(["install", "-r"])
        .arg(Invocation::path_arg(requirements))
        .current_dir(cwd)
}

/// Run an invocation, describing any failure
pub fn run_step(runner: &dyn CommandRunner, invocation: &Invocation) -> Result<(), String> {
    match runner.run(invocation) {
        Ok(exit) if exit.success() => Ok(()),
        Ok(exit) => Err(format!("`{invocation}` exited with {exit}")),
        Err(e) => Err(format!("failed to start `{invocation}`: {e}")),
    }
}
