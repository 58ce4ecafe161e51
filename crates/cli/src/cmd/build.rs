//! Implementation of the `vpbuild build` command.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use vpbuild_lib::pipeline::{BuildOptions, build};
use vpbuild_lib::profile::Profile;
use vpbuild_lib::toolchain::{SystemRunner, ToolError, Toolchain};

use super::project_layout;
use crate::output::{
  OutputFormat, format_duration, print_artifact, print_json, print_stat, print_success, print_tool_output,
};

/// Execute the build command.
///
/// Runs the full pipeline with the real toolchain. When the compiler or the
/// binding generator fails, its captured output is written to stderr
/// unchanged before the error is returned.
pub fn cmd_build(root: &Path, profile: Option<&str>, output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let layout = project_layout(root)?;

  let options = BuildOptions {
    profile: Profile::from_arg(profile),
    toolchain: Toolchain::from_env(),
  };

  let result = match build(&layout, &options, &SystemRunner) {
    Ok(result) => result,
    Err(e) => {
      if let Some((stdout, stderr)) = e.tool_error().and_then(ToolError::diagnostics) {
        print_tool_output(stdout, stderr);
      }
      return Err(e).context("Build failed");
    }
  };

  if output.is_json() {
    return print_json(&result);
  }

  println!();
  print_success(&format!("Built {} bundle", result.profile));
  for artifact in &result.artifacts {
    print_artifact(&artifact.path, artifact.destination, artifact.bytes);
  }
  let rewrites: usize = result.patch_hits.iter().map(|h| h.count).sum();
  print_stat("Loader rewrites", &rewrites.to_string());
  print_stat("Stale files replaced", &result.removed_stale.len().to_string());
  print_stat("Duration", &format_duration(start.elapsed()));

  Ok(())
}
