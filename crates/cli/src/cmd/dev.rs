//! Implementation of the `vpbuild dev` command.

use std::path::Path;

use anyhow::{Context, Result};

use vpbuild_lib::dev::{DevOutcome, dev_loop, interrupt};
use vpbuild_lib::toolchain::Toolchain;

use super::project_layout;
use crate::output::{print_info, print_warning};

/// Execute the dev command.
///
/// Blocks until the dev server exits. Ctrl-C stops the loop and exits with
/// status 0.
pub fn cmd_dev(root: &Path) -> Result<()> {
  let layout = project_layout(root)?;
  let toolchain = Toolchain::from_env();

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let outcome = rt
    .block_on(dev_loop(&layout, &toolchain, interrupt()))
    .context("Dev loop failed")?;

  match outcome {
    DevOutcome::Exited => print_info("Dev server exited"),
    DevOutcome::Cancelled => print_warning("Interrupted, dev loop stopped"),
  }

  Ok(())
}
