//! Build environment snapshot
//!
//! The process environment is an implicit input to detect and build, so it
//! is captured once into an explicit [`BuildEnv`] at orchestration start.
//! Tests construct synthetic snapshots without mutating real process state.

use std::collections::HashMap;

/// Read-only snapshot of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnv {
    vars: HashMap<String, String>,
}

impl BuildEnv {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Add a variable to the snapshot
    #[must_use]
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    /// Look up a variable's value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Whether a variable is present, regardless of value
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for BuildEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
