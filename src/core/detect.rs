//! Detection phase
//!
//! Decides whether this buildpack participates in a build. Participation is
//! keyed on the presence of a single trigger variable; its value is ignored.
//! Detection has no side effects and is deterministic for a given snapshot.

use crate::config::defaults::TRIGGER_ENV;
use crate::core::env::BuildEnv;

/// Outcome of the detect phase, consumed by the orchestrator to decide
/// whether the build phase runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectResult {
    /// The buildpack applies; reason names the triggering condition
    OptIn { reason: String },
    /// The buildpack does not apply
    OptOut { reason: String },
}

impl DetectResult {
    /// Opt in because an environment variable is set
    pub fn env_set(var: &str) -> Self {
        Self::OptIn {
            reason: format!("environment variable {var} is set"),
        }
    }

    /// Opt out because an environment variable is not set
    pub fn env_not_set(var: &str) -> Self {
        Self::OptOut {
            reason: format!("environment variable {var} is not set"),
        }
    }

    /// Whether this result opts the buildpack in
    pub fn is_opt_in(&self) -> bool {
        matches!(self, Self::OptIn { .. })
    }

    /// Human-readable reason for the decision
    pub fn reason(&self) -> &str {
        match self {
            Self::OptIn { reason } | Self::OptOut { reason } => reason,
        }
    }
}

/// Decide participation from an environment snapshot.
pub fn detect(env: &BuildEnv) -> DetectResult {
    if env.contains(TRIGGER_ENV) {
        DetectResult::env_set(TRIGGER_ENV)
    } else {
        DetectResult::env_not_set(TRIGGER_ENV)
    }
}
