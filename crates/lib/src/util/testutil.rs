//! Test utilities for anglebuild-lib.
//!
//! Cross-platform command helpers for runner tests, and fixtures that stand
//! in for what git and ninja would leave on disk.

use std::fs;

use crate::config::BuildConfig;
use crate::consts::BUILD_TARGETS;
use crate::layout::WorkspaceLayout;
use crate::package::artifacts::header_paths;
use crate::platform::os::Os;

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// Returns the command and args for a process exiting with `code`.
pub fn exit_with(code: i32) -> (&'static str, Vec<String>) {
  shell_cmd(&format!("exit {}", code))
}

/// Returns the command and args to create a marker file in the current directory.
#[cfg(unix)]
pub fn touch_file(filename: &str) -> (&'static str, Vec<String>) {
  ("/usr/bin/touch", vec![filename.to_string()])
}

#[cfg(windows)]
pub fn touch_file(filename: &str) -> (&'static str, Vec<String>) {
  (
    "powershell.exe",
    vec![
      "-NoProfile".to_string(),
      "-Command".to_string(),
      format!("New-Item -ItemType File -Path '{}' -Force | Out-Null", filename),
    ],
  )
}

/// Populate the ANGLE include tree with every allow-listed header, written
/// with CRLF line endings the way a Windows checkout would have them. One
/// line per header ends in a doubled CR.
pub fn seed_checkout(layout: &WorkspaceLayout) {
  let include_dir = layout.source_include_dir();
  for rel in header_paths() {
    let path = include_dir.join(&rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let guard = rel.to_string_lossy().replace(['/', '\\', '.'], "_").to_uppercase();
    fs::write(&path, format!("#ifndef {guard}\r\n#define {guard}\r\r\n#endif\r\n")).unwrap();
  }

  // Build-internal files that must never be packaged.
  fs::write(include_dir.join("EGL").join("BUILD.gn"), "# not a header\n").unwrap();
  fs::write(include_dir.join("GLES2").join(".clang-format"), "DisableFormat: true\n").unwrap();
}

/// Create the libraries (and Windows import libraries) ninja would produce.
pub fn seed_build_output(layout: &WorkspaceLayout, config: BuildConfig, os: Os) {
  let out = layout.build_output_dir(config);
  fs::create_dir_all(&out).unwrap();
  for target in BUILD_TARGETS {
    let name = format!("{}.{}", target, os.shared_lib_extension());
    fs::write(out.join(&name), format!("binary {name}")).unwrap();
    if os.is_windows() {
      fs::write(out.join(format!("{name}.lib")), format!("import {name}")).unwrap();
    }
  }
}
