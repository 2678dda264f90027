//! depot_tools bootstrap and ANGLE source synchronization.
//!
//! Both checkouts live under `build/` and are reused across runs:
//! - depot_tools is cloned once (shallow) and then trusted as-is
//! - ANGLE is cloned once, then fetched and hard-reset to the pinned revision
//!   on every run, followed by a gclient dependency sync

use tracing::{debug, info};

use crate::config::PinnedRevision;
use crate::consts::{ANGLE_URL, DEPOT_TOOLS_URL, SOURCE_DIR, TOOLCHAIN_DIR, WIN_TOOLCHAIN_ENV};
use crate::execute::{CommandRunner, ExecContext, ExecError, Invocation, run_checked};
use crate::layout::{CheckoutState, WorkspaceLayout};
use crate::platform::os::Os;

/// Shallow, single-branch, tag-less clone of depot_tools into `build/`.
pub fn toolchain_clone(layout: &WorkspaceLayout) -> Invocation {
  Invocation::new("git", layout.build_dir()).args([
    "clone",
    "--depth=1",
    "--no-tags",
    "--single-branch",
    DEPOT_TOOLS_URL,
    TOOLCHAIN_DIR,
  ])
}

/// Context for every invocation after the bootstrap: depot_tools first on the
/// search path and its Windows toolchain download disabled.
pub fn toolchain_context(layout: &WorkspaceLayout, base: &ExecContext) -> ExecContext {
  base
    .clone()
    .prepend_path(layout.toolchain_dir())
    .with_env(WIN_TOOLCHAIN_ENV, "0")
}

/// Ensure depot_tools is checked out and return the context that exposes it.
///
/// An existing checkout is used without any network access.
pub fn bootstrap_toolchain(
  runner: &dyn CommandRunner,
  layout: &WorkspaceLayout,
  base: &ExecContext,
) -> Result<ExecContext, ExecError> {
  let dir = layout.toolchain_dir();
  if dir.exists() {
    debug!(path = %dir.display(), "depot_tools already present");
  } else {
    info!(url = DEPOT_TOOLS_URL, path = %dir.display(), "cloning depot_tools");
    run_checked(runner, &toolchain_clone(layout), base)?;
  }

  Ok(toolchain_context(layout, base))
}

/// Full-history, single-branch, tag-less clone of ANGLE into `build/`.
pub fn source_clone(layout: &WorkspaceLayout) -> Invocation {
  Invocation::new("git", layout.build_dir()).args(["clone", "--no-tags", "--single-branch", ANGLE_URL, SOURCE_DIR])
}

/// The invocations that bring an existing checkout to `revision`, in order.
pub fn source_update(layout: &WorkspaceLayout, revision: &PinnedRevision, os: Os) -> Vec<Invocation> {
  let dir = layout.source_dir();
  vec![
    Invocation::new("git", &dir).args(["fetch", "--no-tags"]),
    Invocation::new("git", &dir).args(["reset", "--hard", revision.as_str()]),
    Invocation::new("python3", &dir)
      .arg("scripts/bootstrap.py")
      .via_shell(os.is_windows()),
    Invocation::new("gclient", &dir).arg("sync").via_shell(os.is_windows()),
  ]
}

/// Everything the synchronizer would run given the current checkout state.
pub fn source_invocations(
  layout: &WorkspaceLayout,
  revision: &PinnedRevision,
  os: Os,
  state: CheckoutState,
) -> Vec<Invocation> {
  let mut invocations = Vec::new();
  if !state.source_present {
    invocations.push(source_clone(layout));
  }
  invocations.extend(source_update(layout, revision, os));
  invocations
}

/// Bring the ANGLE checkout to exactly `revision` and sync its dependencies.
///
/// Local modifications to tracked files are discarded. The first failing
/// step aborts the sync; the checkout is left as that step left it.
pub fn sync_source(
  runner: &dyn CommandRunner,
  context: &ExecContext,
  layout: &WorkspaceLayout,
  revision: &PinnedRevision,
  os: Os,
) -> Result<(), ExecError> {
  let state = CheckoutState::inspect(layout);
  if !state.source_present {
    info!(url = ANGLE_URL, path = %layout.source_dir().display(), "cloning angle");
  }

  info!(revision = %revision, "syncing angle");
  for invocation in source_invocations(layout, revision, os, state) {
    run_checked(runner, &invocation, context)?;
  }

  Ok(())
}
