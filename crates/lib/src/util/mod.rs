//! Shared utilities.
//!
//! Filesystem helpers used by the pipeline and cleanup, plus test helpers.

pub mod fs;
