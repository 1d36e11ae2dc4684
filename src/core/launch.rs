//! Launch command declaration
//!
//! The sole build output consumed by the serving runtime: an executable path
//! plus its ordered arguments, declared exactly once per successful build and
//! immutable afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::defaults::INVOKER_PATH;
use crate::error::ManifestError;

/// Ordered argv registered as the process that serves requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchCommand {
    /// Executable followed by its arguments
    pub command: Vec<String>,
}

impl LaunchCommand {
    /// Launch command for the function invoker serving the given target
    pub fn invoker(target: &str) -> Self {
        Self {
            command: vec![
                INVOKER_PATH.to_string(),
                "--target".to_string(),
                target.to_string(),
            ],
        }
    }
}

/// Serialized launch declaration written for the serving runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchFile {
    /// Declared processes; this buildpack declares exactly one
    pub processes: Vec<LaunchProcess>,
}

/// A single declared process entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchProcess {
    /// Process type, `web` for the request-serving entry point
    #[serde(rename = "type")]
    pub process_type: String,
    /// Executable and arguments
    pub command: Vec<String>,
}

impl LaunchFile {
    /// Declaration holding a single web process
    pub fn web(launch: &LaunchCommand) -> Self {
        Self {
            processes: vec![LaunchProcess {
                process_type: "web".to_string(),
                command: launch.command.clone(),
            }],
        }
    }

    /// Write the declaration as TOML
    pub fn write(&self, path: &Path) -> Result<(), ManifestError> {
        let content = toml::to_string_pretty(self).map_err(|e| ManifestError::WriteFile {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ManifestError::WriteFile {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }
}
