use std::process::Command;

use tracing::{debug, info};

use super::{Invocation, ToolError, ToolOutput, ToolRunner};

/// Runs invocations as real child processes.
///
/// The child's stdout and stderr are captured. Waiting is unbounded: a hung
/// tool hangs the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
  fn run(&self, invocation: &Invocation) -> Result<ToolOutput, ToolError> {
    let program = invocation.program_name();
    info!(cmd = %invocation, "running");

    let mut command = Command::new(&invocation.program);
    command.args(&invocation.args);
    if let Some(cwd) = &invocation.cwd {
      command.current_dir(cwd);
    }

    let output = command.output().map_err(|source| ToolError::Spawn {
      program: program.clone(),
      source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
      return Err(ToolError::Failed {
        program,
        code: output.status.code(),
        stdout,
        stderr,
      });
    }

    if !stderr.is_empty() {
      debug!(program = %program, stderr = %stderr, "tool stderr");
    }
    if !stdout.is_empty() {
      debug!(program = %program, stdout = %stdout, "tool stdout");
    }

    Ok(ToolOutput {
      code: output.status.code(),
      stdout,
      stderr,
    })
  }
}
