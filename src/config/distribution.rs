//! Pinned SDK distribution manifest
//!
//! The distribution version and URL are configuration data rather than
//! literals in the build sequence, so the pin can move without code changes.
//! The built-in default reproduces the behavior of a bare invocation; a
//! manifest file passed via `build --manifest` overrides it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ManifestError;

/// Pinned GraalVM version used when no manifest file is given
pub const DEFAULT_VERSION: &str = "21.0.0.2";

/// Download URL for the pinned version (Java 11, linux-amd64)
pub const DEFAULT_URL: &str = "https://github.com/graalvm/graalvm-ce-builds/releases/download/vm-21.0.0.2/graalvm-ce-java11-linux-amd64-21.0.0.2.tar.gz";

/// A pinned SDK distribution: version, archive URL, optional checksum.
///
/// When `sha256` is present the downloaded archive is verified against it;
/// when absent no integrity check is performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionManifest {
    /// Distribution version, for display and cache attribution
    pub version: String,
    /// Archive URL (gzipped tarball, fetched over HTTPS)
    pub url: String,
    /// Expected SHA256 of the archive, hex-encoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl Default for DistributionManifest {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            url: DEFAULT_URL.to_string(),
            sha256: None,
        }
    }
}

impl DistributionManifest {
    /// Parse a manifest from TOML content
    pub fn from_toml(content: &str) -> Result<Self, ManifestError> {
        toml::from_str(content).map_err(|source| ManifestError::Parse { source })
    }

    /// Load a manifest from a file
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|e| ManifestError::ReadFile {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Load a manifest from a file, or fall back to the built-in pin
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ManifestError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
