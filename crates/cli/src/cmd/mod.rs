mod build;
mod plan;

pub use build::cmd_build;
pub use plan::cmd_plan;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use anglebuild_lib::config::Settings;
use anglebuild_lib::layout::WorkspaceLayout;
use anglebuild_lib::platform::Platform;
use anglebuild_lib::platform::paths::d3dcompiler_redist;

/// Everything a build or dry run needs, resolved before anything is touched.
pub struct Target {
  pub layout: WorkspaceLayout,
  pub settings: Settings,
  pub platform: Platform,
  pub d3dcompiler: Option<PathBuf>,
}

/// Validate the configuration and read the pinned revision from `root`
/// (or the current directory).
pub fn resolve_target(root: Option<&Path>, config: &str) -> Result<Target> {
  let root = match root {
    Some(root) => root.to_path_buf(),
    None => std::env::current_dir().context("Failed to determine current directory")?,
  };
  let root = dunce::canonicalize(&root).with_context(|| format!("Invalid root directory: {}", root.display()))?;

  let layout = WorkspaceLayout::new(root);
  let settings = Settings::load(&layout, config)?;
  let platform = Platform::current();

  let d3dcompiler = if platform.os.is_windows() {
    d3dcompiler_redist(platform.arch)
  } else {
    None
  };
  debug!(root = %layout.root().display(), platform = %platform, d3dcompiler = ?d3dcompiler, "resolved target");

  Ok(Target {
    layout,
    settings,
    platform,
    d3dcompiler,
  })
}
