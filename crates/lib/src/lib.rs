//! vpbuild-lib: build orchestration for the viewport WebAssembly bundle.
//!
//! This crate provides the logic behind the `vpbuild` CLI:
//! - `pipeline`: compile, generate bindings, patch the loader, distribute
//! - `patch`: the declarative loader rewrite rules
//! - `toolchain`: typed invocations of external tools behind `ToolRunner`
//! - `layout`: every path derived from a project root
//! - `clean` and `dev`: recovery and the development loop

pub mod clean;
pub mod consts;
pub mod dev;
pub mod layout;
pub mod patch;
pub mod pipeline;
pub mod profile;
pub mod toolchain;
pub mod util;
