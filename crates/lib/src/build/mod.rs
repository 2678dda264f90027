//! Build configuration and compilation.
//!
//! `gn gen` writes ninja files for the selected configuration into
//! `out/<config>`; a single `autoninja` call then builds both shared
//! library targets.
//!
//! # Submodules
//!
//! - [`args`] - host- and config-dependent `gn` arguments

pub mod args;

use tracing::info;

pub use args::GnArgs;

use crate::config::BuildConfig;
use crate::consts::BUILD_TARGETS;
use crate::execute::{CommandRunner, ExecContext, ExecError, Invocation, run_checked};
use crate::layout::WorkspaceLayout;
use crate::platform::os::Os;

/// `gn gen out/<config> --args=<flags>`, run from the ANGLE checkout.
pub fn gen_invocation(layout: &WorkspaceLayout, config: BuildConfig, os: Os) -> Invocation {
  let args = GnArgs::for_host(config, os);
  Invocation::new("gn", layout.source_dir())
    .args([
      "gen".to_string(),
      WorkspaceLayout::relative_build_output(config),
      format!("--args={}", args),
    ])
    .via_shell(os.is_windows())
}

/// `autoninja -C out/<config> libEGL libGLESv2`, run from the ANGLE checkout.
pub fn compile_invocation(layout: &WorkspaceLayout, config: BuildConfig, os: Os) -> Invocation {
  Invocation::new("autoninja", layout.source_dir())
    .args(["-C".to_string(), WorkspaceLayout::relative_build_output(config)])
    .args(BUILD_TARGETS)
    .via_shell(os.is_windows())
}

/// Generate build files for `config`.
pub fn configure(
  runner: &dyn CommandRunner,
  context: &ExecContext,
  layout: &WorkspaceLayout,
  config: BuildConfig,
  os: Os,
) -> Result<GnArgs, ExecError> {
  let args = GnArgs::for_host(config, os);
  info!(config = %config, os = %os, args = %args, "preparing build");
  run_checked(runner, &gen_invocation(layout, config, os), context)?;
  Ok(args)
}

/// Build `libEGL` and `libGLESv2`.
pub fn compile(
  runner: &dyn CommandRunner,
  context: &ExecContext,
  layout: &WorkspaceLayout,
  config: BuildConfig,
  os: Os,
) -> Result<(), ExecError> {
  info!(config = %config, targets = ?BUILD_TARGETS, "building");
  run_checked(runner, &compile_invocation(layout, config, os), context)
}
