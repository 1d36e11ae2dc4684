//! Error types for graalpack
//!
//! Domain-specific error types using thiserror. External tool failures keep
//! the underlying tool's own diagnostic output verbatim so operators can act
//! on the wrapped tool's message rather than a translated one.

use std::path::PathBuf;
use thiserror::Error;

/// Layer provisioning errors
#[derive(Error, Debug)]
pub enum LayerError {
    /// Failed to create or restore the layer directory
    #[error("Failed to provision layer '{name}' at '{path}': {error}")]
    Provision {
        name: String,
        path: PathBuf,
        error: String,
    },

    /// Failed to read or write layer metadata
    #[error("Failed to access layer metadata at '{path}': {error}")]
    Metadata { path: PathBuf, error: String },
}

/// External command errors
#[derive(Error, Debug)]
pub enum ExecError {
    /// Command could not be spawned
    #[error("Failed to start '{program}': {error}")]
    Spawn { program: String, error: String },

    /// Command exited with a non-zero status
    #[error("'{program}' exited with status {status}:\n{stderr}")]
    ExitStatus {
        program: String,
        status: i32,
        stderr: String,
    },
}

/// Download errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Network error
    #[error("Network error downloading '{url}': {error}")]
    NetworkError { url: String, error: String },

    /// Server returned a non-success status
    #[error("HTTP {status} downloading '{url}'")]
    HttpStatus { url: String, status: u16 },

    /// Checksum verification failed
    #[error("Checksum mismatch for '{url}': expected {expected}, got {actual}")]
    ChecksumMismatch {
        url: String,
        expected: String,
        actual: String,
    },

    /// IO error
    #[error("IO error for '{path}': {error}")]
    IoError { path: PathBuf, error: String },
}

/// Archive extraction errors
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Malformed or unreadable archive
    #[error("Failed to read archive '{path}': {error}")]
    Archive { path: PathBuf, error: String },

    /// Failed to write an extracted entry
    #[error("Failed to extract to '{path}': {error}")]
    IoError { path: PathBuf, error: String },
}

/// Distribution manifest errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file missing or unreadable
    #[error("Failed to read distribution manifest '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Manifest parse error
    #[error("Failed to parse distribution manifest: {source}")]
    Parse { source: toml::de::Error },

    /// Declaration file could not be written
    #[error("Failed to write '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },
}

/// Build errors
///
/// Every variant is terminal: no step is retried and nothing is recovered
/// internally. The orchestrator sees the original failure plus a short
/// attribution of which step triggered it.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Required environment variable absent; fails before any side effect
    #[error("Required environment variable '{variable}' is not set")]
    MissingConfiguration { variable: String },

    /// An external command failed during the named build step
    #[error("Build step '{step}' failed: {source}")]
    Command {
        step: &'static str,
        source: ExecError,
    },

    /// Layer provisioning failure, propagated opaquely
    #[error("Layer provisioning failed: {0}")]
    Layer(#[from] LayerError),

    /// SDK archive download failure
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    /// SDK archive extraction failure
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Distribution manifest failure
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
}
