//! The packaged file set.
//!
//! Headers are an explicit allow-list, not a directory copy: ANGLE's include
//! tree also carries build-internal files that consumers must not see. The
//! list has to track the pinned revision; a header that disappears upstream
//! fails packaging instead of silently vanishing from the output.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::BuildConfig;
use crate::consts::{BUILD_TARGETS, D3DCOMPILER_DLL};
use crate::layout::WorkspaceLayout;
use crate::platform::Platform;

/// Headers of one API family, living in `include/<dir>`.
#[derive(Debug, Clone, Copy)]
pub struct HeaderFamily {
  pub dir: &'static str,
  pub files: &'static [&'static str],
}

pub const HEADER_FAMILIES: &[HeaderFamily] = &[
  HeaderFamily {
    dir: "KHR",
    files: &["khrplatform.h"],
  },
  HeaderFamily {
    dir: "EGL",
    files: &["egl.h", "eglext.h", "eglext_angle.h", "eglplatform.h"],
  },
  HeaderFamily {
    dir: "GLES",
    files: &["egl.h", "gl.h", "glext.h", "glplatform.h"],
  },
  HeaderFamily {
    dir: "GLES2",
    files: &["gl2.h", "gl2ext.h", "gl2ext_angle.h", "gl2platform.h"],
  },
  HeaderFamily {
    dir: "GLES3",
    files: &["gl3.h", "gl31.h", "gl32.h", "gl3platform.h"],
  },
];

/// Header paths relative to `include/`, e.g. `EGL/egl.h`.
pub fn header_paths() -> Vec<PathBuf> {
  HEADER_FAMILIES
    .iter()
    .flat_map(|family| family.files.iter().map(move |file| Path::new(family.dir).join(file)))
    .collect()
}

/// One file destined for `lib/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryArtifact {
  /// File name inside `lib/`.
  pub name: String,
  pub source: PathBuf,
  /// Whether the install name is rewritten to be executable-relative.
  pub rewrite_install_name: bool,
}

/// Everything copied into the output tree for one platform and config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
  /// `(source, relative destination under include/)`
  pub headers: Vec<(PathBuf, PathBuf)>,
  pub libraries: Vec<LibraryArtifact>,
}

impl ArtifactSet {
  /// Resolve the artifact set against a workspace.
  ///
  /// `d3dcompiler` is the SDK redistributable copied next to the Windows
  /// libraries; it is ignored on other hosts.
  pub fn resolve(
    layout: &WorkspaceLayout,
    config: BuildConfig,
    platform: Platform,
    d3dcompiler: Option<&Path>,
  ) -> Self {
    let include_dir = layout.source_include_dir();
    let headers = header_paths()
      .into_iter()
      .map(|rel| (include_dir.join(&rel), rel))
      .collect();

    let build_dir = layout.build_output_dir(config);
    let os = platform.os;
    let ext = os.shared_lib_extension();

    let mut libraries: Vec<LibraryArtifact> = BUILD_TARGETS
      .iter()
      .map(|target| {
        let name = format!("{}.{}", target, ext);
        LibraryArtifact {
          source: build_dir.join(&name),
          name,
          rewrite_install_name: os.rewrites_install_name(),
        }
      })
      .collect();

    if os.is_windows() {
      for target in BUILD_TARGETS {
        let name = format!("{}.{}.lib", target, ext);
        libraries.push(LibraryArtifact {
          source: build_dir.join(&name),
          name,
          rewrite_install_name: false,
        });
      }

      // Without a known SDK location the expected path is still listed, so
      // the pre-flight check reports it as missing.
      let source = d3dcompiler.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(D3DCOMPILER_DLL));
      libraries.push(LibraryArtifact {
        name: D3DCOMPILER_DLL.to_string(),
        source,
        rewrite_install_name: false,
      });
    }

    Self { headers, libraries }
  }

  /// Sources that do not exist on disk, in allow-list order.
  pub fn missing(&self) -> Vec<PathBuf> {
    self
      .headers
      .iter()
      .map(|(source, _)| source)
      .chain(self.libraries.iter().map(|lib| &lib.source))
      .filter(|source| !source.is_file())
      .cloned()
      .collect()
  }
}
