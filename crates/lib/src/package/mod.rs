//! Artifact packaging.
//!
//! Produces `build/angle.out` from scratch on every run:
//!
//! ```text
//! angle.out/include/{KHR,EGL,GLES,GLES2,GLES3}/*.h
//! angle.out/lib/libEGL.<ext>, libGLESv2.<ext> (+ Windows companions)
//! ```
//!
//! Headers are written with LF line endings regardless of the host, so the
//! output is byte-identical wherever it was produced.
//!
//! # Submodules
//!
//! - [`artifacts`] - header allow-list and per-platform library set
//! - [`clean`] - output directory reset with read-only recovery

pub mod artifacts;
pub mod clean;

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

pub use artifacts::{ArtifactSet, HEADER_FAMILIES, HeaderFamily, LibraryArtifact};

use crate::config::BuildConfig;
use crate::execute::{CommandRunner, ExecContext, ExecError, Invocation, run_checked};
use crate::layout::WorkspaceLayout;
use crate::platform::Platform;

/// Errors that can occur while packaging.
#[derive(Debug, Error)]
pub enum PackageError {
  /// Allow-listed files absent from the checkout or build output.
  #[error("{} artifact(s) missing: {}", .0.len(), display_paths(.0))]
  MissingArtifacts(Vec<PathBuf>),

  #[error("failed to reset output directory '{path}': {source}")]
  ResetOutput {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to create directory '{path}': {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to copy '{from}' to '{to}': {source}")]
  Copy {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to normalize line endings in '{path}': {source}")]
  Normalize {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to rewrite install name of '{path}': {source}")]
  InstallName {
    path: PathBuf,
    #[source]
    source: ExecError,
  },
}

impl PackageError {
  /// Exit code of a failed external tool, if packaging stopped on one.
  pub fn exit_code(&self) -> Option<i32> {
    match self {
      Self::InstallName { source, .. } => source.exit_code(),
      _ => None,
    }
  }
}

fn display_paths(paths: &[PathBuf]) -> String {
  paths
    .iter()
    .map(|p| p.display().to_string())
    .collect::<Vec<_>>()
    .join(", ")
}

/// What ended up in the output tree, relative to its root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackagedArtifacts {
  pub headers: Vec<PathBuf>,
  pub libraries: Vec<PathBuf>,
}

/// Inputs for one packaging pass.
pub struct Packager<'a> {
  pub runner: &'a dyn CommandRunner,
  pub context: &'a ExecContext,
  pub layout: &'a WorkspaceLayout,
  pub config: BuildConfig,
  pub platform: Platform,
  pub d3dcompiler: Option<&'a Path>,
}

impl Packager<'_> {
  /// Rebuild the output tree from the checkout and build output.
  ///
  /// All sources are checked before the old output is removed, so a stale
  /// allow-list leaves the previous package intact.
  pub fn package(&self) -> Result<PackagedArtifacts, PackageError> {
    let set = ArtifactSet::resolve(self.layout, self.config, self.platform, self.d3dcompiler);

    let missing = set.missing();
    if !missing.is_empty() {
      return Err(PackageError::MissingArtifacts(missing));
    }

    let output_dir = self.layout.output_dir();
    info!(path = %output_dir.display(), "copying build artifacts");

    clean::reset_dir(&output_dir).map_err(|e| PackageError::ResetOutput {
      path: output_dir.clone(),
      source: e,
    })?;
    self.create_tree()?;

    let mut packaged = PackagedArtifacts::default();

    let include_dir = self.layout.output_include_dir();
    for (source, rel) in &set.headers {
      let dest = include_dir.join(rel);
      copy_file(source, &dest)?;
      normalize_line_endings(&dest)?;
      packaged.headers.push(Path::new("include").join(rel));
    }

    let lib_dir = self.layout.output_lib_dir();
    for lib in &set.libraries {
      let dest = lib_dir.join(&lib.name);
      copy_file(&lib.source, &dest)?;
      if lib.rewrite_install_name {
        self.rewrite_install_name(&dest, &lib.name)?;
      }
      packaged.libraries.push(Path::new("lib").join(&lib.name));
    }

    info!(
      headers = packaged.headers.len(),
      libraries = packaged.libraries.len(),
      "packaged artifacts"
    );
    Ok(packaged)
  }

  fn create_tree(&self) -> Result<(), PackageError> {
    let include_dir = self.layout.output_include_dir();
    let dirs = HEADER_FAMILIES
      .iter()
      .map(|family| include_dir.join(family.dir))
      .chain(std::iter::once(self.layout.output_lib_dir()));

    for dir in dirs {
      fs::create_dir_all(&dir).map_err(|e| PackageError::CreateDir { path: dir.clone(), source: e })?;
    }
    Ok(())
  }

  fn rewrite_install_name(&self, path: &Path, name: &str) -> Result<(), PackageError> {
    let invocation = install_name_invocation(path, name);
    run_checked(self.runner, &invocation, self.context).map_err(|e| PackageError::InstallName {
      path: path.to_path_buf(),
      source: e,
    })
  }
}

/// `install_name_tool -id @executable_path/<name> <path>`
pub fn install_name_invocation(path: &Path, name: &str) -> Invocation {
  let dir = path.parent().unwrap_or(Path::new("."));
  Invocation::new("install_name_tool", dir).args([
    "-id".to_string(),
    format!("@executable_path/{}", name),
    path.display().to_string(),
  ])
}

fn copy_file(from: &Path, to: &Path) -> Result<(), PackageError> {
  debug!(from = %from.display(), to = %to.display(), "copying");
  fs::copy(from, to).map_err(|e| PackageError::Copy {
    from: from.to_path_buf(),
    to: to.to_path_buf(),
    source: e,
  })?;
  Ok(())
}

/// Collapse every line terminator of the form `\r+\n` to a single LF.
///
/// CR bytes that are not followed by LF are kept.
pub fn crlf_to_lf(content: &[u8]) -> Cow<'_, [u8]> {
  if !content.windows(2).any(|w| w == b"\r\n") {
    return Cow::Borrowed(content);
  }

  let mut out = Vec::with_capacity(content.len());
  let mut i = 0;
  while i < content.len() {
    if content[i] != b'\r' {
      out.push(content[i]);
      i += 1;
      continue;
    }
    let run_end = content[i..]
      .iter()
      .position(|&b| b != b'\r')
      .map_or(content.len(), |n| i + n);
    if content.get(run_end) != Some(&b'\n') {
      out.extend_from_slice(&content[i..run_end]);
    }
    i = run_end;
  }
  Cow::Owned(out)
}

/// Rewrite `path` in place with LF line endings. Returns whether it changed.
pub fn normalize_line_endings(path: &Path) -> Result<bool, PackageError> {
  let err = |e| PackageError::Normalize {
    path: path.to_path_buf(),
    source: e,
  };

  let content = fs::read(path).map_err(err)?;
  match crlf_to_lf(&content) {
    Cow::Borrowed(_) => Ok(false),
    Cow::Owned(normalized) => {
      fs::write(path, normalized).map_err(err)?;
      Ok(true)
    }
  }
}
