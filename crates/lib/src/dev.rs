//! Development loop: package the crate in dev mode, refresh the frontend's
//! dependency on it, then run the frontend dev server.
//!
//! Children get an explicit working directory and inherit the terminal. The
//! first interrupt stops whatever step is running, kills its child, and ends
//! the loop with [`DevOutcome::Cancelled`].

use std::future::Future;
use std::io;
use std::pin::Pin;

use thiserror::Error;
use tokio::process::Command;
use tracing::{info, warn};

use crate::layout::Layout;
use crate::toolchain::{Invocation, Toolchain};

#[derive(Debug, Error)]
pub enum DevError {
  #[error("failed to spawn {program}: {source}")]
  Spawn { program: String, source: io::Error },

  #[error("failed waiting for {program}: {source}")]
  Wait { program: String, source: io::Error },

  #[error("{step} failed: {program} exited with code {code:?}")]
  StepFailed {
    step: &'static str,
    program: String,
    code: Option<i32>,
  },
}

/// How the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevOutcome {
  /// The dev server exited on its own.
  Exited,
  /// An interrupt arrived.
  Cancelled,
}

enum StepOutcome {
  Done,
  Cancelled,
}

/// Run the loop until the dev server exits or `shutdown` resolves.
pub async fn dev_loop<F>(layout: &Layout, toolchain: &Toolchain, shutdown: F) -> Result<DevOutcome, DevError>
where
  F: Future<Output = ()>,
{
  tokio::pin!(shutdown);

  let steps = [
    ("dev packaging", toolchain.package_dev(layout)),
    ("dependency refresh", toolchain.refresh_dependencies(layout)),
    ("dev server", toolchain.dev_server(layout)),
  ];

  for (step, invocation) in steps {
    info!(step, cmd = %invocation, "starting");
    match run_until(step, &invocation, &mut shutdown).await? {
      StepOutcome::Done => {}
      StepOutcome::Cancelled => {
        warn!(step, "interrupted");
        return Ok(DevOutcome::Cancelled);
      }
    }
  }

  Ok(DevOutcome::Exited)
}

/// Resolves on the first Ctrl-C. If the handler cannot be installed the loop
/// simply runs without cancellation.
pub async fn interrupt() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    warn!(error = %e, "failed to listen for interrupt");
    std::future::pending::<()>().await;
  }
}

async fn run_until<F>(
  step: &'static str,
  invocation: &Invocation,
  shutdown: &mut Pin<&mut F>,
) -> Result<StepOutcome, DevError>
where
  F: Future<Output = ()>,
{
  let program = invocation.program_name();

  let mut command = Command::new(&invocation.program);
  command.args(&invocation.args).kill_on_drop(true);
  if let Some(cwd) = &invocation.cwd {
    command.current_dir(cwd);
  }

  let mut child = command.spawn().map_err(|source| DevError::Spawn {
    program: program.clone(),
    source,
  })?;

  let exited = tokio::select! {
    status = child.wait() => Some(status),
    _ = shutdown.as_mut() => None,
  };

  match exited {
    Some(status) => {
      let status = status.map_err(|source| DevError::Wait {
        program: program.clone(),
        source,
      })?;
      if status.success() {
        Ok(StepOutcome::Done)
      } else {
        Err(DevError::StepFailed {
          step,
          program,
          code: status.code(),
        })
      }
    }
    None => {
      if let Err(e) = child.kill().await {
        warn!(program = %program, error = %e, "failed to stop child");
      }
      Ok(StepOutcome::Cancelled)
    }
  }
}
