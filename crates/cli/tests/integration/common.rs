//! Shared test helpers for CLI integration tests.
//!
//! Builds run against shell scripts standing in for git, python3, gclient,
//! gn, autoninja and install_name_tool. Each script appends its command line
//! to `calls.log` in the test root so the order of invocations can be checked.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

pub const SHA: &str = "4d2a8c6e10f3b5a7c9e1d3f5a7b9c1e3f5a7b9c1";

pub const HEADERS: &[&str] = &[
  "KHR/khrplatform.h",
  "EGL/egl.h",
  "EGL/eglext.h",
  "EGL/eglext_angle.h",
  "EGL/eglplatform.h",
  "GLES/egl.h",
  "GLES/gl.h",
  "GLES/glext.h",
  "GLES/glplatform.h",
  "GLES2/gl2.h",
  "GLES2/gl2ext.h",
  "GLES2/gl2ext_angle.h",
  "GLES2/gl2platform.h",
  "GLES3/gl3.h",
  "GLES3/gl31.h",
  "GLES3/gl32.h",
  "GLES3/gl3platform.h",
];

/// Records the call, then exits 0.
const RECORD: &str = r#"#!/bin/sh
echo "$(basename "$0") $*" >> "$ANGLEBUILD_TEST_LOG"
"#;

/// Records the call and leaves libraries behind in the `-C` directory.
const FAKE_AUTONINJA: &str = r#"#!/bin/sh
echo "autoninja $*" >> "$ANGLEBUILD_TEST_LOG"
mkdir -p "$2"
for lib in libEGL libGLESv2; do
  for ext in so dylib; do
    echo "$lib" > "$2/$lib.$ext"
  done
done
"#;

/// Isolated test environment.
///
/// Each test gets its own root holding `commit.txt`, the `build/` tree and a
/// `bin/` directory of fake tools placed in front of `PATH`.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// A root with `commit.txt` and both checkouts already present, so no
  /// clone is needed.
  pub fn with_checkouts() -> Self {
    let env = Self::empty();
    env.write_file("commit.txt", &format!("{SHA}\n"));
    std::fs::create_dir_all(env.root().join("build/depot_tools")).unwrap();
    for header in HEADERS {
      env.write_file(
        &format!("build/angle/include/{header}"),
        &format!("// {header}\r\r\n#pragma once\r\n"),
      );
    }
    env.write_file("build/angle/include/EGL/BUILD.gn", "# internal\n");
    env.install_default_tools();
    env
  }

  /// Create an empty test environment.
  pub fn empty() -> Self {
    Self { temp: TempDir::new().unwrap() }
  }

  pub fn root(&self) -> PathBuf {
    let p = self.temp.path().to_path_buf();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  pub fn output_dir(&self) -> PathBuf {
    self.root().join("build/angle.out")
  }

  /// Write a file relative to the root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  fn bin_dir(&self) -> PathBuf {
    self.temp.path().join("bin")
  }

  /// Install an executable script named `name` into `bin/`.
  pub fn install_tool(&self, name: &str, script: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = self.bin_dir().join(name);
    std::fs::create_dir_all(self.bin_dir()).unwrap();
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  }

  /// Install a tool that records its call and exits with `code`.
  pub fn install_failing_tool(&self, name: &str, code: i32) {
    self.install_tool(name, &format!("{RECORD}exit {code}\n"));
  }

  fn install_default_tools(&self) {
    for tool in ["git", "python3", "gclient", "gn", "install_name_tool"] {
      self.install_tool(tool, RECORD);
    }
    self.install_tool("autoninja", FAKE_AUTONINJA);
  }

  /// Recorded tool calls, in order.
  pub fn calls(&self) -> Vec<String> {
    std::fs::read_to_string(self.log_path())
      .unwrap_or_default()
      .lines()
      .map(str::to_string)
      .collect()
  }

  fn log_path(&self) -> PathBuf {
    self.temp.path().join("calls.log")
  }

  /// Get a pre-configured Command for the anglebuild binary.
  ///
  /// Sets environment variables for isolated testing:
  /// - `ANGLEBUILD_ROOT`: the test root
  /// - `PATH`: fake tools first, then the inherited search path
  /// - `ANGLEBUILD_TEST_LOG`: where fake tools record their calls
  pub fn anglebuild_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("anglebuild");
    cmd.env_remove("ANGLEBUILD_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd.env("ANGLEBUILD_ROOT", self.root());
    cmd.env("PATH", search_path(&self.bin_dir()));
    cmd.env("ANGLEBUILD_TEST_LOG", self.log_path());
    cmd
  }
}

fn search_path(first: &Path) -> std::ffi::OsString {
  let inherited = std::env::var_os("PATH").unwrap_or_default();
  let dirs = std::iter::once(first.to_path_buf()).chain(std::env::split_paths(&inherited));
  std::env::join_paths(dirs).unwrap()
}
