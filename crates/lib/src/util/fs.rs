//! Filesystem helpers that treat "already gone" as success.

use std::io;
use std::path::Path;

/// Remove a file, returning whether it existed.
pub fn remove_file_if_exists(path: &Path) -> io::Result<bool> {
  match std::fs::remove_file(path) {
    Ok(()) => Ok(true),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
    Err(e) => Err(e),
  }
}

/// Remove a directory tree, returning whether it existed.
pub fn remove_dir_if_exists(path: &Path) -> io::Result<bool> {
  match std::fs::remove_dir_all(path) {
    Ok(()) => Ok(true),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
    Err(e) => Err(e),
  }
}
