//! Run configuration: the pinned revision and the build configuration.
//!
//! Both are validated before the pipeline touches the network or the
//! filesystem. A bad `--config` value or an empty `commit.txt` stops the run
//! with nothing changed on disk.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::layout::WorkspaceLayout;

/// Errors raised while loading the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// The revision file could not be read (usually: it does not exist).
  #[error("failed to read revision file '{path}': {source}")]
  ReadRevision {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The revision file exists but holds nothing but whitespace.
  #[error("revision file '{path}' is empty")]
  EmptyRevision { path: PathBuf },

  #[error("invalid configuration '{0}', only 'release' or 'debug' allowed")]
  InvalidBuildConfig(String),
}

/// Build configuration passed to `gn` as `is_debug` and used as the output directory name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildConfig {
  #[default]
  Release,
  Debug,
}

impl BuildConfig {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Release => "release",
      Self::Debug => "debug",
    }
  }

  pub fn is_debug(&self) -> bool {
    matches!(self, Self::Debug)
  }
}

impl FromStr for BuildConfig {
  type Err = ConfigError;

  /// Case-insensitive; anything other than `release` or `debug` is rejected.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let normalized = s.to_lowercase();
    match normalized.as_str() {
      "release" => Ok(Self::Release),
      "debug" => Ok(Self::Debug),
      _ => Err(ConfigError::InvalidBuildConfig(normalized)),
    }
  }
}

impl fmt::Display for BuildConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// The upstream revision the checkout is hard-reset to.
///
/// Treated as opaque: anything non-empty is accepted. Upstream pins are full
/// commit hashes, so other shapes are logged but still used verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PinnedRevision(String);

impl PinnedRevision {
  /// Parse revision file content. Surrounding whitespace is dropped.
  pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
      return Err(ConfigError::EmptyRevision {
        path: path.to_path_buf(),
      });
    }

    if !is_full_commit_hash(trimmed) {
      warn!(revision = trimmed, "pinned revision is not a full commit hash");
    }

    Ok(Self(trimmed.to_string()))
  }

  /// Read and parse the revision file at `path`.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadRevision {
      path: path.to_path_buf(),
      source: e,
    })?;
    Self::parse(&content, path)
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for PinnedRevision {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

fn is_full_commit_hash(rev: &str) -> bool {
  rev.len() == 40 && rev.chars().all(|c| c.is_ascii_hexdigit())
}

/// Validated inputs of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
  pub revision: PinnedRevision,
  pub config: BuildConfig,
}

impl Settings {
  /// Validate `config` and read the revision file at the workspace root.
  ///
  /// The config flag is checked first so an invalid flag is reported even
  /// when the revision file is also missing.
  pub fn load(layout: &WorkspaceLayout, config: &str) -> Result<Self, ConfigError> {
    let config = config.parse::<BuildConfig>()?;
    let revision = PinnedRevision::load(&layout.revision_file())?;
    debug!(revision = %revision, config = %config, "loaded settings");
    Ok(Self { revision, config })
  }
}
