//! Scripted [`CommandRunner`] for exercising the pipeline without real tools.
//!
//! Every invocation is recorded together with the context it ran under.
//! Failures are scripted by predicate; side effects a real tool would have
//! (a clone creating its directory, ninja producing libraries) are scripted
//! with hooks that run on success.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::runner::CommandRunner;
use super::types::{ExecContext, ExecError, ExitStatus, Invocation};

type Matcher = Box<dyn Fn(&Invocation) -> bool>;
type Hook = Box<dyn Fn(&Invocation)>;

/// One call seen by a [`RecordingRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
  pub invocation: Invocation,
  pub path_prefix: Vec<PathBuf>,
  pub env: BTreeMap<String, String>,
}

#[derive(Default)]
pub struct RecordingRunner {
  calls: RefCell<Vec<RecordedCall>>,
  failures: Vec<(Matcher, ExitStatus)>,
  indexed_failures: Vec<(usize, ExitStatus)>,
  hooks: Vec<(Matcher, Hook)>,
}

impl RecordingRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Exit with `status` for invocations matching `matcher`. First match wins.
  pub fn fail_when(mut self, matcher: impl Fn(&Invocation) -> bool + 'static, status: ExitStatus) -> Self {
    self.failures.push((Box::new(matcher), status));
    self
  }

  /// Exit with `code` whenever `program` is invoked with `first_arg`.
  pub fn fail_command(self, program: &str, first_arg: &str, code: i32) -> Self {
    let program = program.to_string();
    let first_arg = first_arg.to_string();
    self.fail_when(
      move |inv| inv.program == program && inv.args.first().is_some_and(|a| *a == first_arg),
      ExitStatus::Code(code),
    )
  }

  /// Exit with `status` on the `index`th call (zero-based), whatever it is.
  pub fn fail_at(mut self, index: usize, status: ExitStatus) -> Self {
    self.indexed_failures.push((index, status));
    self
  }

  /// Run `hook` after each successful invocation matching `matcher`.
  pub fn on_success(
    mut self,
    matcher: impl Fn(&Invocation) -> bool + 'static,
    hook: impl Fn(&Invocation) + 'static,
  ) -> Self {
    self.hooks.push((Box::new(matcher), Box::new(hook)));
    self
  }

  pub fn calls(&self) -> Vec<RecordedCall> {
    self.calls.borrow().clone()
  }

  pub fn invocations(&self) -> Vec<Invocation> {
    self.calls.borrow().iter().map(|c| c.invocation.clone()).collect()
  }

  pub fn command_lines(&self) -> Vec<String> {
    self.calls.borrow().iter().map(|c| c.invocation.command_line()).collect()
  }

  /// Whether any recorded call starts with `program first_arg`.
  pub fn ran(&self, program: &str, first_arg: &str) -> bool {
    self
      .calls
      .borrow()
      .iter()
      .any(|c| c.invocation.program == program && c.invocation.args.first().is_some_and(|a| a == first_arg))
  }
}

impl CommandRunner for RecordingRunner {
  fn run(&self, invocation: &Invocation, context: &ExecContext) -> Result<ExitStatus, ExecError> {
    let index = {
      let mut calls = self.calls.borrow_mut();
      calls.push(RecordedCall {
        invocation: invocation.clone(),
        path_prefix: context.path_prefix().to_vec(),
        env: context.env().clone(),
      });
      calls.len() - 1
    };

    if let Some((_, status)) = self.indexed_failures.iter().find(|(at, _)| *at == index) {
      return Ok(*status);
    }
    if let Some((_, status)) = self.failures.iter().find(|(matches, _)| matches(invocation)) {
      return Ok(*status);
    }

    for (matches, hook) in &self.hooks {
      if matches(invocation) {
        hook(invocation);
      }
    }

    Ok(ExitStatus::Code(0))
  }
}
