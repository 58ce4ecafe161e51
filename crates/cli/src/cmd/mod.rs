mod build;
mod clean;
mod dev;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use dev::cmd_dev;

use std::path::Path;

use anyhow::{Context, Result};
use vpbuild_lib::layout::Layout;

fn project_layout(root: &Path) -> Result<Layout> {
  Layout::discover(root).with_context(|| format!("Project root not found: {}", root.display()))
}
