//! The fetch-build-package pipeline.
//!
//! Stages run strictly in order and the first failure stops the run:
//!
//! 1. toolchain bootstrap (clone depot_tools once)
//! 2. source sync (clone once, fetch, hard reset, gclient sync)
//! 3. build configuration (`gn gen`)
//! 4. compilation (`autoninja`)
//! 5. packaging (`angle.out`)
//!
//! Nothing is retried. A failed run leaves the workspace as the failing stage
//! left it; re-running picks up from the existing checkouts.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::build::{self, GnArgs};
use crate::config::{BuildConfig, PinnedRevision, Settings};
use crate::execute::{CommandRunner, ExecContext, ExecError, Invocation};
use crate::fetch;
use crate::layout::{CheckoutState, WorkspaceLayout};
use crate::package::{self, ArtifactSet, PackageError, Packager};
use crate::platform::Platform;
use crate::util::hash::{ContentHash, DirHashError, hash_directory};

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
  Toolchain,
  Source,
  Configure,
  Compile,
  Package,
}

impl Stage {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Toolchain => "toolchain bootstrap",
      Self::Source => "source sync",
      Self::Configure => "build configuration",
      Self::Compile => "compilation",
      Self::Package => "packaging",
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Errors that stop a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("failed to create build directory '{path}': {source}")]
  CreateBuildDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// An external tool failed during `stage`.
  #[error("{stage} failed: {source}")]
  Stage {
    stage: Stage,
    #[source]
    source: ExecError,
  },

  #[error("packaging failed: {0}")]
  Package(#[from] PackageError),

  #[error("failed to hash output tree: {0}")]
  Digest(#[from] DirHashError),
}

impl PipelineError {
  /// The stage that failed, if the failure belongs to one.
  pub fn stage(&self) -> Option<Stage> {
    match self {
      Self::Stage { stage, .. } => Some(*stage),
      Self::Package(_) | Self::Digest(_) => Some(Stage::Package),
      Self::CreateBuildDir { .. } => None,
    }
  }

  /// Process exit code for this failure.
  ///
  /// A failed external tool's own exit code is passed through; everything
  /// else (and tools killed by a signal) maps to 1.
  pub fn exit_code(&self) -> i32 {
    let tool_code = match self {
      Self::Stage { source, .. } => source.exit_code(),
      Self::Package(e) => e.exit_code(),
      _ => None,
    };
    tool_code.filter(|code| *code != 0).unwrap_or(1)
  }
}

/// One external invocation the pipeline will perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
  pub stage: Stage,
  pub invocation: Invocation,
}

/// Summary of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
  pub revision: PinnedRevision,
  pub config: BuildConfig,
  pub platform: Platform,
  pub gn_args: GnArgs,
  pub output_dir: PathBuf,
  pub headers: Vec<PathBuf>,
  pub libraries: Vec<PathBuf>,
  /// SHA-256 over the packaged tree; equal across runs of the same inputs.
  pub digest: ContentHash,
  pub elapsed_ms: u64,
}

pub struct Pipeline<'a> {
  runner: &'a dyn CommandRunner,
  layout: WorkspaceLayout,
  settings: Settings,
  platform: Platform,
  base_context: ExecContext,
  d3dcompiler: Option<PathBuf>,
}

impl<'a> Pipeline<'a> {
  /// A pipeline whose invocations inherit the current process `PATH`.
  pub fn new(runner: &'a dyn CommandRunner, layout: WorkspaceLayout, settings: Settings, platform: Platform) -> Self {
    Self {
      runner,
      layout,
      settings,
      platform,
      base_context: ExecContext::inherit(),
      d3dcompiler: None,
    }
  }

  pub fn with_base_context(mut self, context: ExecContext) -> Self {
    self.base_context = context;
    self
  }

  /// SDK copy of `d3dcompiler_47.dll`, required when packaging for Windows.
  pub fn with_d3dcompiler(mut self, path: Option<PathBuf>) -> Self {
    self.d3dcompiler = path;
    self
  }

  /// The invocations a run would perform right now, without performing them.
  ///
  /// Clone steps appear only for checkouts that do not exist yet.
  pub fn plan(&self) -> Vec<PlannedStep> {
    let state = CheckoutState::inspect(&self.layout);
    let Settings { revision, config } = &self.settings;
    let os = self.platform.os;

    let mut steps = Vec::new();
    let mut push = |stage: Stage, invocation: Invocation| steps.push(PlannedStep { stage, invocation });

    if !state.toolchain_present {
      push(Stage::Toolchain, fetch::toolchain_clone(&self.layout));
    }
    for invocation in fetch::source_invocations(&self.layout, revision, os, state) {
      push(Stage::Source, invocation);
    }
    push(Stage::Configure, build::gen_invocation(&self.layout, *config, os));
    push(Stage::Compile, build::compile_invocation(&self.layout, *config, os));

    let set = ArtifactSet::resolve(&self.layout, *config, self.platform, self.d3dcompiler.as_deref());
    let lib_dir = self.layout.output_lib_dir();
    for lib in set.libraries.iter().filter(|lib| lib.rewrite_install_name) {
      push(
        Stage::Package,
        package::install_name_invocation(&lib_dir.join(&lib.name), &lib.name),
      );
    }

    steps
  }

  /// Run every stage in order.
  pub fn run(&self) -> Result<PipelineReport, PipelineError> {
    let start = Instant::now();
    let Settings { revision, config } = &self.settings;
    let config = *config;
    let os = self.platform.os;

    info!(revision = %revision, config = %config, platform = %self.platform, "building angle");

    let build_dir = self.layout.build_dir();
    fs::create_dir_all(&build_dir).map_err(|e| PipelineError::CreateBuildDir {
      path: build_dir.clone(),
      source: e,
    })?;

    info!("checking depot_tools");
    let context = fetch::bootstrap_toolchain(self.runner, &self.layout, &self.base_context)
      .map_err(|e| stage_error(Stage::Toolchain, e))?;

    info!("checking angle");
    fetch::sync_source(self.runner, &context, &self.layout, revision, os).map_err(|e| stage_error(Stage::Source, e))?;

    let gn_args = build::configure(self.runner, &context, &self.layout, config, os)
      .map_err(|e| stage_error(Stage::Configure, e))?;

    build::compile(self.runner, &context, &self.layout, config, os).map_err(|e| stage_error(Stage::Compile, e))?;

    let packaged = Packager {
      runner: self.runner,
      context: &context,
      layout: &self.layout,
      config,
      platform: self.platform,
      d3dcompiler: self.d3dcompiler.as_deref(),
    }
    .package()?;

    let output_dir = self.layout.output_dir();
    let digest = hash_directory(&output_dir)?;
    info!(path = %output_dir.display(), digest = %digest, "package ready");

    Ok(PipelineReport {
      revision: revision.clone(),
      config,
      platform: self.platform,
      gn_args,
      output_dir,
      headers: packaged.headers,
      libraries: packaged.libraries,
      digest,
      elapsed_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
    })
  }
}

fn stage_error(stage: Stage, source: ExecError) -> PipelineError {
  PipelineError::Stage { stage, source }
}
