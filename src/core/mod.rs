//! Detect and build logic
//!
//! No I/O happens here directly; every side effect goes through the
//! capability traits in [`crate::infra`].

pub mod build;
pub mod detect;
pub mod env;
pub mod launch;
