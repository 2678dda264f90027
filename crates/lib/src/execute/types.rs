//! Types for external command execution.
//!
//! An [`Invocation`] names a single external tool call; an [`ExecContext`]
//! carries the environment it runs under. Nothing here mutates the process
//! environment, so several pipelines can coexist in one process.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// How an external process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
  Code(i32),
  /// Terminated without an exit code (killed by a signal on Unix).
  Signal,
}

impl ExitStatus {
  pub fn success(self) -> bool {
    matches!(self, Self::Code(0))
  }

  pub fn code(self) -> Option<i32> {
    match self {
      Self::Code(code) => Some(code),
      Self::Signal => None,
    }
  }
}

impl From<std::process::ExitStatus> for ExitStatus {
  fn from(status: std::process::ExitStatus) -> Self {
    status.code().map_or(Self::Signal, Self::Code)
  }
}

impl fmt::Display for ExitStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Code(code) => write!(f, "exit code {}", code),
      Self::Signal => write!(f, "termination by signal"),
    }
  }
}

/// Errors that can occur while running an external command.
#[derive(Debug, Error)]
pub enum ExecError {
  /// The process could not be started at all.
  #[error("failed to spawn '{program}': {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// The process ran and reported failure.
  #[error("command failed with {status}: {cmd}")]
  CmdFailed { cmd: String, status: ExitStatus },

  /// A search path entry contains the platform's path separator.
  #[error("invalid search path entry: {0}")]
  SearchPath(#[from] std::env::JoinPathsError),
}

impl ExecError {
  /// Exit code of the failed tool, if it produced one.
  pub fn exit_code(&self) -> Option<i32> {
    match self {
      Self::CmdFailed { status, .. } => status.code(),
      _ => None,
    }
  }
}

/// A single external tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: PathBuf,
  /// Launch through the platform shell. depot_tools entry points are batch
  /// scripts on Windows and cannot be spawned directly there.
  pub shell: bool,
}

impl Invocation {
  pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: cwd.into(),
      shell: false,
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn via_shell(mut self, shell: bool) -> Self {
    self.shell = shell;
    self
  }

  /// Space-joined program and arguments, for logs and error messages.
  pub fn command_line(&self) -> String {
    std::iter::once(self.program.as_str())
      .chain(self.args.iter().map(String::as_str))
      .collect::<Vec<_>>()
      .join(" ")
  }
}

impl fmt::Display for Invocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.command_line())
  }
}

/// Environment applied to every invocation of a pipeline run.
///
/// Search path prefixes are placed in front of the base `PATH`, most recently
/// prepended first. With no prefixes the child inherits `PATH` untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecContext {
  base_path: Option<OsString>,
  path_prefix: Vec<PathBuf>,
  env: BTreeMap<String, String>,
}

impl ExecContext {
  /// Context based on the current process `PATH`.
  pub fn inherit() -> Self {
    Self {
      base_path: std::env::var_os("PATH"),
      ..Self::default()
    }
  }

  /// Context with an explicit base `PATH`.
  pub fn with_base_path(base_path: impl Into<OsString>) -> Self {
    Self {
      base_path: Some(base_path.into()),
      ..Self::default()
    }
  }

  pub fn prepend_path(mut self, dir: impl Into<PathBuf>) -> Self {
    self.path_prefix.insert(0, dir.into());
    self
  }

  pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.env.insert(key.into(), value.into());
    self
  }

  pub fn path_prefix(&self) -> &[PathBuf] {
    &self.path_prefix
  }

  pub fn env(&self) -> &BTreeMap<String, String> {
    &self.env
  }

  pub fn var(&self, key: &str) -> Option<&str> {
    self.env.get(key).map(String::as_str)
  }

  /// The `PATH` value children should see, or `None` to inherit unchanged.
  pub fn search_path(&self) -> Result<Option<OsString>, ExecError> {
    if self.path_prefix.is_empty() {
      return Ok(None);
    }

    let base = self
      .base_path
      .as_deref()
      .map(|p| std::env::split_paths(p).collect::<Vec<_>>())
      .unwrap_or_default();

    let entries = self.path_prefix.iter().chain(base.iter()).map(PathBuf::as_path);
    Ok(Some(std::env::join_paths(entries)?))
  }
}
