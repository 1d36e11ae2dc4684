//! Graalpack - GraalVM native-image buildpack for Java functions
//!
//! This library implements the detect/build lifecycle of a build-time plugin
//! that prepares a Java function for execution as an ahead-of-time compiled
//! native binary.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Detect and build logic (no I/O of its own)
//! - [`infra`] - Infrastructure layer (network, filesystem, processes)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling
//!
//! All side effects in `core` flow through the capability traits defined in
//! `infra` ([`infra::layer::LayerManager`], [`infra::exec::ProcessExecutor`],
//! [`infra::download::Fetcher`]), so the build sequence is testable without
//! touching the network or spawning processes.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
