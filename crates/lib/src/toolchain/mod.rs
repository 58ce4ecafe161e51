//! External tool invocation.
//!
//! Each call to the compiler, binding generator or package manager is an
//! [`Invocation`] handed to a [`ToolRunner`]. The runner blocks until the
//! process exits and reports a typed [`ToolOutput`], so failure propagation
//! stays explicit and a fake runner can stand in for real toolchains.

mod runner;

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::consts::WASM_TARGET;
use crate::layout::Layout;
use crate::profile::Profile;

pub use runner::SystemRunner;

/// Errors from running an external tool.
#[derive(Debug, Error)]
pub enum ToolError {
  /// The program could not be started at all.
  #[error("failed to spawn {program}: {source}")]
  Spawn { program: String, source: std::io::Error },

  /// The program ran and exited unsuccessfully.
  #[error("{program} failed with exit code {code:?}")]
  Failed {
    program: String,
    code: Option<i32>,
    stdout: String,
    stderr: String,
  },
}

impl ToolError {
  /// Diagnostic output captured from the failed tool, if any.
  pub fn diagnostics(&self) -> Option<(&str, &str)> {
    match self {
      ToolError::Failed { stdout, stderr, .. } => Some((stdout, stderr)),
      ToolError::Spawn { .. } => None,
    }
  }
}

/// A single external program call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub program: OsString,
  pub args: Vec<OsString>,
  /// Working directory of the child. The parent's directory is never changed.
  pub cwd: Option<PathBuf>,
}

impl Invocation {
  pub fn new(program: impl Into<OsString>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
    }
  }

  pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.cwd = Some(dir.into());
    self
  }

  pub fn program_name(&self) -> String {
    self.program.to_string_lossy().into_owned()
  }

  /// Index of the first argument equal to `flag`.
  pub fn position(&self, flag: &str) -> Option<usize> {
    self.args.iter().position(|a| a == flag)
  }

  /// Value following `flag`, for `--flag value` style arguments.
  pub fn value_of(&self, flag: &str) -> Option<&Path> {
    let index = self.position(flag)?;
    self.args.get(index + 1).map(Path::new)
  }
}

impl fmt::Display for Invocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program.to_string_lossy())?;
    for arg in &self.args {
      write!(f, " {}", arg.to_string_lossy())?;
    }
    Ok(())
  }
}

/// Captured result of a successful tool run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

/// Runs invocations to completion.
pub trait ToolRunner {
  /// Run `invocation`, blocking until it exits.
  ///
  /// A non-zero exit is reported as [`ToolError::Failed`].
  fn run(&self, invocation: &Invocation) -> Result<ToolOutput, ToolError>;
}

/// Program names for each external tool.
///
/// Defaults to the names on `PATH`; each can be overridden through an
/// environment variable (`CARGO`, `WASM_BINDGEN`, `WASM_PACK`, `NPM`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
  pub cargo: OsString,
  pub wasm_bindgen: OsString,
  pub wasm_pack: OsString,
  pub npm: OsString,
}

impl Default for Toolchain {
  fn default() -> Self {
    Self {
      cargo: "cargo".into(),
      wasm_bindgen: "wasm-bindgen".into(),
      wasm_pack: "wasm-pack".into(),
      npm: "npm".into(),
    }
  }
}

impl Toolchain {
  pub fn from_env() -> Self {
    let defaults = Self::default();
    let var = |name: &str, default: OsString| std::env::var_os(name).filter(|v| !v.is_empty()).unwrap_or(default);

    Self {
      cargo: var("CARGO", defaults.cargo),
      wasm_bindgen: var("WASM_BINDGEN", defaults.wasm_bindgen),
      wasm_pack: var("WASM_PACK", defaults.wasm_pack),
      npm: var("NPM", defaults.npm),
    }
  }

  /// `cargo build [--release] --manifest-path <crate>/Cargo.toml --target wasm32-unknown-unknown`
  pub fn compile(&self, layout: &Layout, profile: Profile) -> Invocation {
    Invocation::new(&self.cargo)
      .arg("build")
      .args(profile.cargo_flag())
      .arg("--manifest-path")
      .arg(layout.manifest_path())
      .arg("--target")
      .arg(WASM_TARGET)
  }

  /// `wasm-bindgen --target web --out-dir <staging> <compiled wasm>`
  pub fn generate_bindings(&self, layout: &Layout, profile: Profile) -> Invocation {
    Invocation::new(&self.wasm_bindgen)
      .args(["--target", "web", "--out-dir"])
      .arg(layout.staging_dir())
      .arg(layout.compiled_wasm(profile))
  }

  /// `wasm-pack build --dev --target web <crate>`
  pub fn package_dev(&self, layout: &Layout) -> Invocation {
    Invocation::new(&self.wasm_pack)
      .args(["build", "--dev", "--target", "web"])
      .arg(layout.crate_dir())
  }

  /// `npm install`, run inside the frontend.
  pub fn refresh_dependencies(&self, layout: &Layout) -> Invocation {
    Invocation::new(&self.npm)
      .arg("install")
      .current_dir(layout.frontend_dir())
  }

  /// `npm start`, run inside the frontend.
  pub fn dev_server(&self, layout: &Layout) -> Invocation {
    Invocation::new(&self.npm).arg("start").current_dir(layout.frontend_dir())
  }
}
