//! Launcher configuration (config.yaml)
//!
//! Settings are layered: built-in defaults, then the YAML config file, then command line
//! flags (which clap also fills from `PARRUN_*` environment variables).
//!
//! The config file lives at `<config dir>/parrun/config.yaml` and can be moved with
//! `PARRUN_CONFIG` or `--config`. A missing file is not an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{self, Result};

/// Config directory name under the user's config directory
const CONFIG_DIR: &str = "parrun";

/// Config file name
const CONFIG_FILE: &str = "config.yaml";

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "PARRUN_CONFIG";

#[cfg(windows)]
const DEFAULT_INTERPRETER: &str = "python";
#[cfg(not(windows))]
const DEFAULT_INTERPRETER: &str = "python3";

/// Launcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LauncherConfig {
    /// Interpreter used to install requirements and run entry scripts
    pub interpreter: PathBuf,

    /// Privileged package manager command; package names are appended
    pub package_manager: Vec<String>,

    /// Pass `--break-system-packages` to the direct pip install
    pub break_system_packages: bool,

    /// Where extraction directories are created (system temp dir when unset)
    pub extraction_dir: Option<PathBuf>,

    /// Keep extraction directories after the run
    pub keep_extracted: bool,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            interpreter: PathBuf::from(DEFAULT_INTERPRETER),
            package_manager: ["sudo", "apt", "install", "-y"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            break_system_packages: true,
            extraction_dir: None,
            keep_extracted: false,
        }
    }
}

/// Command line overrides applied on top of the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub interpreter: Option<PathBuf>,
    pub extraction_dir: Option<PathBuf>,
    pub keep_extracted: bool,
}

impl LauncherConfig {
    /// Load the configuration from `path`, or from the default location when `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path(),
        };

        let config = match path {
            Some(ref p) if p.is_file() => Self::from_file(p)?,
            Some(ref p) => {
                tracing::debug!(path = %p.display(), "no config file, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| error::config::read_failed(path.display().to_string(), e.to_string()))?;
        Self::from_yaml(&content)
            .map_err(|e| error::config::parse_failed(path.display().to_string(), e.to_string()))
    }

    /// Parse config YAML; an empty document yields the defaults
    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Apply command line overrides
    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(interpreter) = overrides.interpreter {
            self.interpreter = interpreter;
        }
        if let Some(dir) = overrides.extraction_dir {
            self.extraction_dir = Some(dir);
        }
        self.keep_extracted |= overrides.keep_extracted;
        self.interpreter = resolve_interpreter(self.interpreter);
        self
    }

    /// Reject configurations that cannot run anything
    pub fn validate(&self) -> Result<()> {
        if self.interpreter.as_os_str().is_empty() {
            return Err(error::config::invalid("'interpreter' must not be empty"));
        }
        if self.package_manager.is_empty() {
            return Err(error::config::invalid(
                "'package_manager' must name at least a program",
            ));
        }
        Ok(())
    }
}

/// Anchor an interpreter path to the launcher's working directory.
///
/// Child processes run inside the extraction directory, where a relative path such as
/// `./venv/bin/python` would no longer resolve. Bare program names stay as they are so
/// they are still looked up on `PATH`.
fn resolve_interpreter(interpreter: PathBuf) -> PathBuf {
    if interpreter.is_absolute() || interpreter.components().count() < 2 {
        return interpreter;
    }
    match std::path::absolute(&interpreter) {
        Ok(absolute) => absolute,
        Err(e) => {
            tracing::warn!(
                interpreter = %interpreter.display(),
                error = %e,
                "cannot resolve relative interpreter path"
            );
            interpreter
        }
    }
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}
