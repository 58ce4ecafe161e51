//! Filesystem layout of a project the pipeline operates on.
//!
//! Every path the pipeline reads or writes is derived from a single project
//! root, so nothing depends on the process working directory.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::consts::{CRATE_NAME, FRONTEND_DIR, STAGING_DIR, WASM_TARGET};
use crate::profile::Profile;

/// Which destination tree an artifact is distributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
  /// Served statically, fetched at runtime.
  PublicAssets,
  /// Imported by the frontend's own code.
  SourceModule,
}

impl fmt::Display for Destination {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Destination::PublicAssets => f.write_str("public assets"),
      Destination::SourceModule => f.write_str("source module"),
    }
  }
}

/// One of the four files the binding generator emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Artifact {
  /// `viewport_bg.wasm`
  Wasm,
  /// `viewport_bg.wasm.d.ts`
  WasmTypes,
  /// `viewport.d.ts`
  Types,
  /// `viewport.js`
  Loader,
}

impl Artifact {
  /// All generated artifacts, in distribution order.
  pub const ALL: [Artifact; 4] = [Artifact::Wasm, Artifact::WasmTypes, Artifact::Types, Artifact::Loader];

  pub fn file_name(self) -> String {
    match self {
      Artifact::Wasm => format!("{CRATE_NAME}_bg.wasm"),
      Artifact::WasmTypes => format!("{CRATE_NAME}_bg.wasm.d.ts"),
      Artifact::Types => format!("{CRATE_NAME}.d.ts"),
      Artifact::Loader => format!("{CRATE_NAME}.js"),
    }
  }

  pub fn destination(self) -> Destination {
    match self {
      Artifact::Wasm => Destination::PublicAssets,
      Artifact::WasmTypes | Artifact::Types | Artifact::Loader => Destination::SourceModule,
    }
  }
}

impl fmt::Display for Artifact {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.file_name())
  }
}

/// Paths of a project checkout: the wasm crate and the frontend side by side.
#[derive(Debug, Clone)]
pub struct Layout {
  root: PathBuf,
}

impl Layout {
  /// Layout rooted at `root`, used as given.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Layout rooted at the canonical form of `root`.
  pub fn discover(root: &Path) -> io::Result<Self> {
    Ok(Self::new(dunce::canonicalize(root)?))
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn crate_dir(&self) -> PathBuf {
    self.root.join(CRATE_NAME)
  }

  pub fn manifest_path(&self) -> PathBuf {
    self.crate_dir().join("Cargo.toml")
  }

  /// Binary cargo produces for `profile`.
  pub fn compiled_wasm(&self, profile: Profile) -> PathBuf {
    self
      .crate_dir()
      .join("target")
      .join(WASM_TARGET)
      .join(profile.output_dir())
      .join(format!("{CRATE_NAME}.wasm"))
  }

  pub fn staging_dir(&self) -> PathBuf {
    self.root.join(STAGING_DIR)
  }

  pub fn frontend_dir(&self) -> PathBuf {
    self.root.join(FRONTEND_DIR)
  }

  pub fn public_dir(&self) -> PathBuf {
    self.frontend_dir().join("public")
  }

  pub fn module_dir(&self) -> PathBuf {
    self.frontend_dir().join("src").join("wasm")
  }

  pub fn destination_dir(&self, destination: Destination) -> PathBuf {
    match destination {
      Destination::PublicAssets => self.public_dir(),
      Destination::SourceModule => self.module_dir(),
    }
  }

  pub fn staged(&self, artifact: Artifact) -> PathBuf {
    self.staging_dir().join(artifact.file_name())
  }

  pub fn distributed(&self, artifact: Artifact) -> PathBuf {
    self
      .destination_dir(artifact.destination())
      .join(artifact.file_name())
  }
}
