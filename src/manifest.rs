//! Bundle manifest (par.json)
//!
//! The manifest is optional. When present it must be a JSON object; recognized keys are
//! `entry_point` (string) and `sudo` (boolean), plus the informational `name`, `version` and
//! `description`. Unknown keys are ignored so older launchers can run newer bundles.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{self, Result};

/// Manifest file name at the bundle root
pub const MANIFEST_FILE: &str = "par.json";

/// Entry script used when the manifest does not name one
pub const DEFAULT_ENTRY_POINT: &str = "main.py";

/// Bundle manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Script to run, relative to the bundle root
    pub entry_point: String,

    /// System packages need explicit confirmation before installing
    pub sudo: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            sudo: false,
            name: None,
            version: None,
            description: None,
        }
    }
}

impl Manifest {
    /// Parse manifest JSON
    pub fn from_json(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

/// Load the manifest from an extracted bundle, falling back to defaults when absent
pub fn load(bundle_dir: &Path) -> Result<Manifest> {
    let path = bundle_dir.join(MANIFEST_FILE);
    if !path.is_file() {
        tracing::debug!(dir = %bundle_dir.display(), "no manifest, using defaults");
        return Ok(Manifest::default());
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| error::manifest::invalid(MANIFEST_FILE, e.to_string()))?;
    let manifest = Manifest::from_json(&content)
        .map_err(|e| error::manifest::invalid(MANIFEST_FILE, e.to_string()))?;

    tracing::debug!(
        entry_point = %manifest.entry_point,
        sudo = manifest.sudo,
        "loaded manifest"
    );
    Ok(manifest)
}
