//! Fixed names shared across the pipeline.

/// Name of the external crate compiled to WebAssembly.
pub const CRATE_NAME: &str = "viewport";

/// Directory (relative to the project root) of the frontend project.
pub const FRONTEND_DIR: &str = "frontend";

/// Transient directory the binding generator writes into.
pub const STAGING_DIR: &str = "temp";

pub const WASM_TARGET: &str = "wasm32-unknown-unknown";
