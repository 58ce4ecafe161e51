use std::path::Path;

use anyhow::{Context, Result};

use vpbuild_lib::clean::clean;

use super::project_layout;
use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success};

pub fn cmd_clean(root: &Path, output: OutputFormat) -> Result<()> {
  let layout = project_layout(root)?;

  let result = clean(&layout).context("Clean failed")?;

  if output.is_json() {
    return print_json(&result);
  }

  if result.is_noop() {
    print_info("Nothing to clean");
    return Ok(());
  }

  print_success("Clean complete!");
  print_stat("Staging removed", if result.removed_staging { "yes" } else { "no" });
  print_stat("Artifacts removed", &result.removed_paths.len().to_string());

  Ok(())
}
