use std::path::{Path, PathBuf};

use predicates::prelude::*;
use serial_test::serial;
use walkdir::WalkDir;

use super::common::{HEADERS, SHA, TestEnv};

fn files_under(root: &Path) -> Vec<PathBuf> {
  let mut files: Vec<PathBuf> = WalkDir::new(root)
    .into_iter()
    .filter_map(|e| e.ok())
    .filter(|e| e.file_type().is_file())
    .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
    .collect();
  files.sort();
  files
}

fn lib_ext() -> &'static str {
  if cfg!(target_os = "macos") { "dylib" } else { "so" }
}

#[test]
#[serial]
fn build_packages_headers_and_libraries() {
  let env = TestEnv::with_checkouts();

  env
    .anglebuild_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("ANGLE build complete"));

  let files = files_under(&env.output_dir());
  assert_eq!(files.len(), HEADERS.len() + 2);
  for header in HEADERS {
    let path = env.output_dir().join("include").join(header);
    let content = std::fs::read(&path).unwrap();
    assert!(!content.windows(2).any(|w| w == b"\r\n"), "{header} has CRLF");
  }
  assert!(env.output_dir().join(format!("lib/libEGL.{}", lib_ext())).is_file());
  assert!(!env.output_dir().join("include/EGL/BUILD.gn").exists());
}

#[test]
#[serial]
fn build_runs_tools_in_order() {
  let env = TestEnv::with_checkouts();

  env.anglebuild_cmd().args(["--config", "DEBUG"]).assert().success();

  let calls = env.calls();
  assert_eq!(calls[0], "git fetch --no-tags");
  assert_eq!(calls[1], format!("git reset --hard {SHA}"));
  assert_eq!(calls[2], "python3 scripts/bootstrap.py");
  assert_eq!(calls[3], "gclient sync");
  assert!(calls[4].starts_with("gn gen out/debug --args="));
  assert!(calls[4].contains("is_debug=true"));
  assert_eq!(calls[5], "autoninja -C out/debug libEGL libGLESv2");
}

#[test]
#[serial]
fn missing_toolchain_is_cloned_first() {
  let env = TestEnv::with_checkouts();
  std::fs::remove_dir_all(env.root().join("build/depot_tools")).unwrap();

  // The fake clone does not create the checkout, so later stages still run
  // against the fake tools in bin/.
  env.anglebuild_cmd().assert().success();

  let calls = env.calls();
  assert!(calls[0].starts_with("git clone --depth=1 --no-tags --single-branch"));
  assert!(calls[0].ends_with("depot_tools"));
  assert_eq!(calls[1], "git fetch --no-tags");
}

#[test]
#[serial]
fn tool_exit_code_becomes_process_exit_code() {
  let env = TestEnv::with_checkouts();
  env.install_failing_tool("gclient", 7);

  env
    .anglebuild_cmd()
    .assert()
    .code(7)
    .stderr(predicate::str::contains("gclient sync"));

  let calls = env.calls();
  assert_eq!(calls.last().map(String::as_str), Some("gclient sync"));
  assert!(!env.output_dir().exists());
}

#[test]
#[serial]
fn compile_failure_keeps_previous_output() {
  let env = TestEnv::with_checkouts();
  env.anglebuild_cmd().assert().success();

  env.install_failing_tool("autoninja", 3);
  env.anglebuild_cmd().assert().code(3);

  assert!(env.output_dir().join("include/KHR/khrplatform.h").is_file());
}

#[test]
#[serial]
fn json_report_is_stable_across_runs() {
  let env = TestEnv::with_checkouts();

  let digest = |env: &TestEnv| {
    let assert = env.anglebuild_cmd().args(["--output", "json"]).assert().success();
    let json: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(json["revision"], SHA);
    assert_eq!(json["headers"].as_array().unwrap().len(), HEADERS.len());
    json["digest"].as_str().unwrap().to_string()
  };

  let first = digest(&env);
  let second = digest(&env);
  assert_eq!(first.len(), 64);
  assert_eq!(first, second);
}

#[test]
#[serial]
fn missing_header_fails_packaging() {
  let env = TestEnv::with_checkouts();
  std::fs::remove_file(env.root().join("build/angle/include/GLES2/gl2ext_angle.h")).unwrap();

  env
    .anglebuild_cmd()
    .assert()
    .code(1)
    .stderr(predicate::str::contains("gl2ext_angle.h"));
}
