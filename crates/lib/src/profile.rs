//! Build profile selection.

use std::fmt;

use serde::Serialize;
use tracing::warn;

/// Compiler profile the pipeline builds with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
  #[default]
  Debug,
  Release,
}

impl Profile {
  /// The only token that selects [`Profile::Release`].
  pub const RELEASE_TOKEN: &'static str = "release";

  /// Resolve the profile from an optional positional argument.
  ///
  /// `"release"` selects release. Absence, or any other value, selects debug.
  pub fn from_arg(arg: Option<&str>) -> Self {
    match arg {
      Some(Self::RELEASE_TOKEN) => Profile::Release,
      None => Profile::Debug,
      Some(other) => {
        warn!(arg = %other, "unrecognized profile, building debug");
        Profile::Debug
      }
    }
  }

  /// Flag passed to `cargo build`, if any.
  pub fn cargo_flag(self) -> Option<&'static str> {
    match self {
      Profile::Debug => None,
      Profile::Release => Some("--release"),
    }
  }

  /// Subdirectory of `target/<triple>/` cargo writes this profile to.
  pub fn output_dir(self) -> &'static str {
    match self {
      Profile::Debug => "debug",
      Profile::Release => "release",
    }
  }
}

impl fmt::Display for Profile {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.output_dir())
  }
}
