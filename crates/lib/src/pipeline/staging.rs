use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Owns the staging directory for the length of one pipeline run.
///
/// The directory is removed when the guard is closed or dropped, so every
/// exit path after creation cleans it up.
#[derive(Debug)]
pub struct Staging {
  path: PathBuf,
  armed: bool,
}

impl Staging {
  /// Create a fresh, empty staging directory. Fails if it already exists.
  pub fn create(path: PathBuf) -> io::Result<Self> {
    fs::create_dir(&path)?;
    debug!(path = %path.display(), "created staging directory");
    Ok(Self { path, armed: true })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Remove the directory, reporting failure instead of only logging it.
  pub fn close(mut self) -> io::Result<()> {
    self.armed = false;
    fs::remove_dir_all(&self.path)?;
    debug!(path = %self.path.display(), "removed staging directory");
    Ok(())
  }
}

impl Drop for Staging {
  fn drop(&mut self) {
    if !self.armed {
      return;
    }
    match fs::remove_dir_all(&self.path) {
      Ok(()) => debug!(path = %self.path.display(), "removed staging directory"),
      Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove staging directory"),
    }
  }
}
