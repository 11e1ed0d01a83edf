//! External process invocation
//!
//! Every program the launcher starts (package manager, pip, venv creation, the entry script)
//! goes through [`CommandRunner`], so the pipeline can be exercised without touching the
//! system.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A program invocation: program, arguments and optional working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Build an invocation from a command line such as `["sudo", "apt", "install", "-y"]`
    pub fn from_command_line(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program).args(args.iter().cloned()))
    }

    /// Path-ish arguments are passed through lossily; invocations only carry UTF-8 paths
    pub fn path_arg(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// How a finished process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
}

impl ProcessExit {
    #[cfg(test)]
    pub const SUCCESS: ProcessExit = ProcessExit { code: Some(0) };

    #[cfg(test)]
    pub fn code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for ProcessExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => f.write_str("signal"),
        }
    }
}

/// Spawns programs and waits for them
pub trait CommandRunner: Send + Sync {
    /// Run the invocation to completion. `Err` means the program could not be started.
    fn run(&self, invocation: &Invocation) -> std::io::Result<ProcessExit>;
}

/// Runs programs for real, with stdio inherited from the launcher
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> std::io::Result<ProcessExit> {
        tracing::debug!(command = %invocation, cwd = ?invocation.cwd, "spawning process");

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        if let Some(ref cwd) = invocation.cwd {
            command.current_dir(cwd);
        }

        let status = command.status()?;
        let exit = ProcessExit {
            code: status.code(),
        };
        tracing::debug!(command = %invocation, %exit, "process finished");
        Ok(exit)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_display() {
        let invocation = Invocation::new("python3")
            .args(["-m", "pip", "install"])
            .arg("-r")
            .arg("requirements.txt");
        assert_eq!(
            invocation.to_string(),
            "python3 -m pip install -r requirements.txt"
        );
    }

    #[test]
    fn test_from_command_line() {
        let command: Vec<String> = vec!["sudo".into(), "apt".into(), "install".into()];
        let invocation = Invocation::from_command_line(&command).unwrap();
        assert_eq!(invocation.program, PathBuf::from("sudo"));
        assert_eq!(invocation.args, vec!["apt", "install"]);
        assert!(Invocation::from_command_line(&[]).is_none());
    }

    #[test]
    fn test_process_exit() {
        assert!(ProcessExit::SUCCESS.success());
        assert!(!ProcessExit::code(1).success());
        assert!(!ProcessExit { code: None }.success());
        assert_eq!(ProcessExit::code(3).to_string(), "exit code 3");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_exit_code() {
        let exit = SystemRunner
            .run(&Invocation::new("sh").args(["-c", "exit 7"]))
            .unwrap();
        assert_eq!(exit.code, Some(7));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_uses_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let exit = SystemRunner
            .run(
                &Invocation::new("sh")
                    .args(["-c", "touch here.txt"])
                    .current_dir(temp.path()),
            )
            .unwrap();
        assert!(exit.success());
        assert!(temp.path().join("here.txt").exists());
    }

    #[test]
    fn test_system_runner_missing_program() {
        let result = SystemRunner.run(&Invocation::new("parrun-definitely-not-a-program"));
        assert!(result.is_err());
    }
}
