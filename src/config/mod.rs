//! Configuration module
//!
//! Constants and the pinned-distribution manifest.

pub mod defaults;
pub mod distribution;
