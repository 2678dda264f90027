//! On-disk workspace layout.
//!
//! ```text
//! <root>/commit.txt
//! <root>/build/depot_tools     toolchain checkout, cloned once
//! <root>/build/angle           source checkout, reset every run
//! <root>/build/angle.out       output root, recreated every run
//! ```

use std::path::{Path, PathBuf};

use crate::config::BuildConfig;
use crate::consts::{BUILD_DIR, OUTPUT_DIR, REVISION_FILE, SOURCE_DIR, TOOLCHAIN_DIR};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
  root: PathBuf,
}

impl WorkspaceLayout {
  /// Layout rooted at the invocation directory.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn revision_file(&self) -> PathBuf {
    self.root.join(REVISION_FILE)
  }

  pub fn build_dir(&self) -> PathBuf {
    self.root.join(BUILD_DIR)
  }

  pub fn toolchain_dir(&self) -> PathBuf {
    self.build_dir().join(TOOLCHAIN_DIR)
  }

  pub fn source_dir(&self) -> PathBuf {
    self.build_dir().join(SOURCE_DIR)
  }

  pub fn output_dir(&self) -> PathBuf {
    self.build_dir().join(OUTPUT_DIR)
  }

  /// `out/<config>`, relative to the source checkout, as handed to gn and ninja.
  pub fn relative_build_output(config: BuildConfig) -> String {
    format!("out/{}", config)
  }

  /// Absolute directory the compiled libraries land in.
  pub fn build_output_dir(&self, config: BuildConfig) -> PathBuf {
    self.source_dir().join("out").join(config.as_str())
  }

  pub fn source_include_dir(&self) -> PathBuf {
    self.source_dir().join("include")
  }

  pub fn output_include_dir(&self) -> PathBuf {
    self.output_dir().join("include")
  }

  pub fn output_lib_dir(&self) -> PathBuf {
    self.output_dir().join("lib")
  }
}

/// Which checkouts already exist. Existing checkouts are never re-cloned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckoutState {
  pub toolchain_present: bool,
  pub source_present: bool,
}

impl CheckoutState {
  pub fn inspect(layout: &WorkspaceLayout) -> Self {
    Self {
      toolchain_present: layout.toolchain_dir().exists(),
      source_present: layout.source_dir().exists(),
    }
  }
}
