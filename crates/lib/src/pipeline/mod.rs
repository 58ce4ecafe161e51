//! The build-and-patch pipeline.
//!
//! One run compiles the wasm crate, generates web bindings into a staging
//! directory, patches the loader script, and distributes the four artifacts
//! to the frontend:
//!
//! | artifact                | destination              |
//! |-------------------------|--------------------------|
//! | `viewport_bg.wasm`      | `frontend/public/`       |
//! | `viewport_bg.wasm.d.ts` | `frontend/src/wasm/`     |
//! | `viewport.d.ts`         | `frontend/src/wasm/`     |
//! | `viewport.js` (patched) | `frontend/src/wasm/`     |
//!
//! Steps run strictly in order and stop at the first failure. Staging is
//! removed on every exit path once created. Only one run per project root may
//! be active at a time; nothing guards against concurrent runs.

mod staging;

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::layout::{Artifact, Destination, Layout};
use crate::patch::{PatchError, RuleHits, patch_loader};
use crate::profile::Profile;
use crate::toolchain::{ToolError, ToolRunner, Toolchain};
use crate::util::fs::remove_file_if_exists;

pub use staging::Staging;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum BuildError {
  #[error("staging directory already exists: {} (a previous run did not finish; remove it or run `vpbuild clean`)", path.display())]
  StagingExists { path: PathBuf },

  #[error("failed to create staging directory {}: {source}", path.display())]
  CreateStaging { path: PathBuf, source: io::Error },

  #[error("failed to remove stale artifact {}: {source}", path.display())]
  RemoveStale { path: PathBuf, source: io::Error },

  #[error("compilation failed: {0}")]
  Compile(#[source] ToolError),

  #[error("binding generation failed: {0}")]
  Bindings(#[source] ToolError),

  #[error("binding generator did not produce {artifact} (expected at {})", path.display())]
  MissingArtifact { artifact: Artifact, path: PathBuf },

  #[error("failed to read loader script {}: {source}", path.display())]
  ReadLoader { path: PathBuf, source: io::Error },

  #[error("failed to write patched loader script {}: {source}", path.display())]
  WriteLoader { path: PathBuf, source: io::Error },

  #[error("patch error: {0}")]
  Patch(#[from] PatchError),

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
  Copy {
    from: PathBuf,
    to: PathBuf,
    source: io::Error,
  },

  #[error("failed to remove staging directory {}: {source}", path.display())]
  RemoveStaging { path: PathBuf, source: io::Error },
}

impl BuildError {
  /// The failed external tool, when the run stopped on one.
  pub fn tool_error(&self) -> Option<&ToolError> {
    match self {
      BuildError::Compile(e) | BuildError::Bindings(e) => Some(e),
      _ => None,
    }
  }
}

/// Options for a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
  pub profile: Profile,
  pub toolchain: Toolchain,
}

/// A file placed into one of the destination trees.
#[derive(Debug, Clone, Serialize)]
pub struct DistributedArtifact {
  pub artifact: Artifact,
  pub destination: Destination,
  pub path: PathBuf,
  pub bytes: u64,
}

/// Result of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
  pub profile: Profile,
  /// Destination files from an earlier run removed before building.
  pub removed_stale: Vec<PathBuf>,
  pub patch_hits: Vec<RuleHits>,
  pub artifacts: Vec<DistributedArtifact>,
}

/// Run the pipeline for `layout`.
///
/// # Errors
///
/// Returns an error, leaving both destination trees without artifacts from
/// this run, if:
/// - the staging directory already exists (checked before anything is touched)
/// - the compiler or the binding generator exits unsuccessfully
/// - the generator did not produce one of the four artifacts
/// - any filesystem operation fails
pub fn build(layout: &Layout, options: &BuildOptions, runner: &dyn ToolRunner) -> Result<BuildResult, BuildError> {
  let profile = options.profile;
  let staging_path = layout.staging_dir();

  if staging_path.exists() {
    return Err(BuildError::StagingExists { path: staging_path });
  }

  info!(profile = %profile, root = %layout.root().display(), "starting build");

  let removed_stale = remove_previous_outputs(layout)?;

  let staging = Staging::create(staging_path.clone()).map_err(|source| match source.kind() {
    io::ErrorKind::AlreadyExists => BuildError::StagingExists {
      path: staging_path.clone(),
    },
    _ => BuildError::CreateStaging {
      path: staging_path.clone(),
      source,
    },
  })?;

  runner
    .run(&options.toolchain.compile(layout, profile))
    .map_err(BuildError::Compile)?;

  runner
    .run(&options.toolchain.generate_bindings(layout, profile))
    .map_err(BuildError::Bindings)?;

  for artifact in Artifact::ALL {
    let path = staging.path().join(artifact.file_name());
    if !path.is_file() {
      return Err(BuildError::MissingArtifact { artifact, path });
    }
  }

  let patch_hits = patch_staged_loader(layout)?;
  let artifacts = distribute(layout)?;

  staging.close().map_err(|source| BuildError::RemoveStaging {
    path: staging_path,
    source,
  })?;

  info!(profile = %profile, count = artifacts.len(), "build complete");

  Ok(BuildResult {
    profile,
    removed_stale,
    patch_hits,
    artifacts,
  })
}

/// Remove destination files a previous run left behind.
pub(crate) fn remove_previous_outputs(layout: &Layout) -> Result<Vec<PathBuf>, BuildError> {
  let mut removed = Vec::new();
  for artifact in Artifact::ALL {
    let path = layout.distributed(artifact);
    let existed = remove_file_if_exists(&path).map_err(|source| BuildError::RemoveStale {
      path: path.clone(),
      source,
    })?;
    if existed {
      debug!(path = %path.display(), "removed stale artifact");
      removed.push(path);
    }
  }
  Ok(removed)
}

fn patch_staged_loader(layout: &Layout) -> Result<Vec<RuleHits>, BuildError> {
  let path = layout.staged(Artifact::Loader);

  let source = fs::read_to_string(&path).map_err(|source| BuildError::ReadLoader {
    path: path.clone(),
    source,
  })?;

  let outcome = patch_loader(&source)?;

  fs::write(&path, &outcome.content).map_err(|source| BuildError::WriteLoader {
    path: path.clone(),
    source,
  })?;

  debug!(path = %path.display(), rewrites = outcome.total_hits(), "patched loader");
  Ok(outcome.hits)
}

fn distribute(layout: &Layout) -> Result<Vec<DistributedArtifact>, BuildError> {
  let mut distributed = Vec::with_capacity(Artifact::ALL.len());

  for artifact in Artifact::ALL {
    let destination = artifact.destination();
    let dir = layout.destination_dir(destination);
    fs::create_dir_all(&dir).map_err(|source| BuildError::CreateDir {
      path: dir.clone(),
      source,
    })?;

    let from = layout.staged(artifact);
    let to = layout.distributed(artifact);
    let bytes = fs::copy(&from, &to).map_err(|source| BuildError::Copy {
      from: from.clone(),
      to: to.clone(),
      source,
    })?;

    debug!(artifact = %artifact, to = %to.display(), bytes, "distributed artifact");
    distributed.push(DistributedArtifact {
      artifact,
      destination,
      path: to,
      bytes,
    });
  }

  Ok(distributed)
}
