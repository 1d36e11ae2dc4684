//! External process execution
//!
//! Runs build-tool commands with captured, attributed output. Commands block
//! to completion; there is no internal timeout or cancellation. Failures keep
//! the tool's own stderr verbatim.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::error::ExecError;

/// Who a command's output is attributed to for diagnostic display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribution {
    /// Output originates from user-controlled configuration or build tooling
    User,
    /// Output originates from the buildpack itself
    Buildpack,
}

/// A command to run: program, arguments, working directory, extra environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecSpec {
    /// Program to invoke
    pub program: String,
    /// Arguments, in order
    pub args: Vec<String>,
    /// Working directory, or the process default
    pub cwd: Option<PathBuf>,
    /// Extra environment variables set for this command
    pub env: Vec<(String, String)>,
    /// Output attribution
    pub attribution: Attribution,
}

impl ExecSpec {
    /// A user-attributed command with no extra environment
    pub fn user(program: impl Into<String>, args: &[&str]) -> Self {
        Self::new(program, args, Attribution::User)
    }

    /// A buildpack-attributed command with no extra environment
    pub fn buildpack(program: impl Into<String>, args: &[&str]) -> Self {
        Self::new(program, args, Attribution::Buildpack)
    }

    fn new(program: impl Into<String>, args: &[&str], attribution: Attribution) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|s| (*s).to_string()).collect(),
            cwd: None,
            env: Vec::new(),
            attribution,
        }
    }

    /// Set the working directory
    #[must_use]
    pub fn with_cwd(mut self, cwd: PathBuf) -> Self {
        self.cwd = Some(cwd);
        self
    }

    /// Add an environment variable
    #[must_use]
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }
}

/// Captured result of a completed command.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// Exit status code
    pub status: i32,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
}

/// Capability for running external commands.
#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    /// Run a command to completion, capturing its output.
    ///
    /// A non-zero exit status is an error carrying the original diagnostics.
    async fn run(&self, spec: &ExecSpec) -> Result<ExecResult, ExecError>;
}

/// Executor spawning real processes via tokio.
#[derive(Debug, Clone, Default)]
pub struct SystemExecutor;

impl SystemExecutor {
    /// Create a new system executor
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessExecutor for SystemExecutor {
    async fn run(&self, spec: &ExecSpec) -> Result<ExecResult, ExecError> {
        debug!(
            program = %spec.program,
            args = ?spec.args,
            attribution = ?spec.attribution,
            "running command"
        );

        let mut command = tokio::process::Command::new(&spec.program);
        command.args(&spec.args);
        if let Some(ref cwd) = spec.cwd {
            command.current_dir(cwd);
        }
        for (key, value) in &spec.env {
            command.env(key, value);
        }

        let output = command.output().await.map_err(|e| ExecError::Spawn {
            program: spec.program.clone(),
            error: e.to_string(),
        })?;

        let status = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(ExecError::ExitStatus {
                program: spec.program.clone(),
                status,
                stderr,
            });
        }

        Ok(ExecResult {
            status,
            stdout,
            stderr,
        })
    }
}

/// Resolve a tool name to an absolute path via PATH lookup.
///
/// Falls back to the bare name, deferring resolution to process spawn, so a
/// missing tool still surfaces as a spawn error for the right program name.
pub fn resolve_tool(name: &str) -> String {
    which::which(name)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| name.to_string())
}
