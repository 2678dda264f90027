use std::fmt;

use serde::Serialize;

use crate::config::BuildConfig;
use crate::platform::os::Os;

/// Ordered `key=value` pairs handed to `gn gen --args=`.
///
/// Windows keeps only the D3D11 backend. Every other host builds Metal and
/// turns off warnings-as-errors, since ANGLE's GPU detection on macOS goes
/// through deprecated CGL calls even when the GL backend is disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GnArgs(Vec<(String, String)>);

impl GnArgs {
  pub fn for_host(config: BuildConfig, os: Os) -> Self {
    let mut args = Self(Vec::new());
    args.push("angle_build_all", "false");
    args.push("angle_build_tests", "false");
    args.push("is_debug", if config.is_debug() { "true" } else { "false" });
    args.push("is_component_build", "false");

    if os.is_windows() {
      args.push("angle_enable_d3d9", "false");
      args.push("angle_enable_gl", "false");
      args.push("angle_enable_vulkan", "false");
      args.push("angle_enable_null", "false");
      args.push("angle_has_frame_capture", "false");
    } else {
      args.push("treat_warnings_as_errors", "false");
      args.push("angle_enable_metal", "true");
      args.push("angle_enable_gl", "false");
      args.push("angle_enable_vulkan", "false");
      args.push("angle_enable_null", "false");
    }

    args
  }

  fn push(&mut self, key: &str, value: &str) {
    self.0.push((key.to_string(), value.to_string()));
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
  }

  pub fn contains(&self, key: &str, value: &str) -> bool {
    self.get(key) == Some(value)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl fmt::Display for GnArgs {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let joined = self.iter().map(|(k, v)| format!("{}={}", k, v)).collect::<Vec<_>>().join(" ");
    write!(f, "{}", joined)
  }
}
