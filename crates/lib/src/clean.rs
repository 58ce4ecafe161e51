//! Remove everything a pipeline run produces.
//!
//! This is the explicit recovery path after an interrupted run: the pipeline
//! itself refuses to start while a staging directory exists.

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::layout::{Artifact, Layout};
use crate::util::fs::{remove_dir_if_exists, remove_file_if_exists};

#[derive(Debug, Error)]
pub enum CleanError {
  #[error("failed to remove {}: {source}", path.display())]
  Remove { path: PathBuf, source: io::Error },
}

#[derive(Debug, Default, Serialize)]
pub struct CleanResult {
  pub removed_staging: bool,
  pub removed_paths: Vec<PathBuf>,
}

impl CleanResult {
  pub fn is_noop(&self) -> bool {
    !self.removed_staging && self.removed_paths.is_empty()
  }
}

/// Remove the staging directory and every known destination artifact.
///
/// Other files in the destination trees are left in place.
pub fn clean(layout: &Layout) -> Result<CleanResult, CleanError> {
  let mut result = CleanResult::default();

  let staging = layout.staging_dir();
  result.removed_staging = remove_dir_if_exists(&staging).map_err(|source| CleanError::Remove {
    path: staging.clone(),
    source,
  })?;
  if result.removed_staging {
    info!(path = %staging.display(), "removed staging directory");
  }

  for artifact in Artifact::ALL {
    let path = layout.distributed(artifact);
    if remove_file_if_exists(&path).map_err(|source| CleanError::Remove {
      path: path.clone(),
      source,
    })? {
      info!(path = %path.display(), "removed artifact");
      result.removed_paths.push(path);
    }
  }

  Ok(result)
}
