//! Process spawning.
//!
//! [`SystemRunner`] is the only place the pipeline starts real processes.
//! Children inherit stdio so tool progress (git, gclient, ninja) streams
//! straight to the terminal.

use std::process::Command;

use tracing::{debug, info};

use super::types::{ExecContext, ExecError, ExitStatus, Invocation};

/// Runs one external command and reports how it ended.
///
/// A non-zero exit is not an error at this level; see [`run_checked`].
pub trait CommandRunner {
  fn run(&self, invocation: &Invocation, context: &ExecContext) -> Result<ExitStatus, ExecError>;
}

/// Run `invocation` and turn any unsuccessful exit into [`ExecError::CmdFailed`].
pub fn run_checked(
  runner: &dyn CommandRunner,
  invocation: &Invocation,
  context: &ExecContext,
) -> Result<(), ExecError> {
  info!(cmd = %invocation, cwd = %invocation.cwd.display(), "running");

  let status = runner.run(invocation, context)?;
  if !status.success() {
    return Err(ExecError::CmdFailed {
      cmd: invocation.command_line(),
      status,
    });
  }

  Ok(())
}

/// Spawns real processes and blocks until they exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  fn run(&self, invocation: &Invocation, context: &ExecContext) -> Result<ExitStatus, ExecError> {
    let mut command = build_command(invocation);
    command.current_dir(&invocation.cwd);

    if let Some(path) = context.search_path()? {
      command.env("PATH", path);
    }
    for (key, value) in context.env() {
      command.env(key, value);
    }

    debug!(program = %invocation.program, shell = invocation.shell, "spawning process");

    let status = command.status().map_err(|e| ExecError::Spawn {
      program: invocation.program.clone(),
      source: e,
    })?;

    Ok(status.into())
  }
}

/// Shell-launched invocations go through `cmd.exe /C` on Windows, where
/// depot_tools ships `.bat` wrappers. Elsewhere they are spawned directly.
fn build_command(invocation: &Invocation) -> Command {
  let (program, prefix) = get_launcher(invocation);
  let mut command = Command::new(program);
  command.args(prefix).args(&invocation.args);
  command
}

#[cfg(windows)]
fn get_launcher(invocation: &Invocation) -> (&str, Vec<&str>) {
  if invocation.shell {
    ("cmd.exe", vec!["/C", invocation.program.as_str()])
  } else {
    (invocation.program.as_str(), Vec::new())
  }
}

#[cfg(not(windows))]
fn get_launcher(invocation: &Invocation) -> (&str, Vec<&str>) {
  (invocation.program.as_str(), Vec::new())
}
