use serde::Serialize;
use std::fmt;

/// Operating system variants anglebuild can drive a build on
///
/// Windows builds the D3D11 backend; every other host takes the Metal path.
/// Hosts other than Linux and macOS are treated as generic POSIX.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
  Linux,
  MacOs,
  Windows,
  Other,
}

impl Os {
  /// Detect the current operating system at runtime
  pub fn current() -> Self {
    Self::from_name(std::env::consts::OS)
  }

  /// Map a `std::env::consts::OS` value to a variant
  pub fn from_name(name: &str) -> Self {
    match name {
      "linux" => Self::Linux,
      "macos" => Self::MacOs,
      "windows" => Self::Windows,
      _ => Self::Other,
    }
  }

  /// Returns the lowercase string identifier for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::MacOs => "darwin",
      Self::Windows => "windows",
      Self::Other => "posix",
    }
  }

  pub fn is_windows(&self) -> bool {
    matches!(self, Self::Windows)
  }

  /// File extension of shared libraries produced by the build
  pub fn shared_lib_extension(&self) -> &'static str {
    match self {
      Self::Linux | Self::Other => "so",
      Self::MacOs => "dylib",
      Self::Windows => "dll",
    }
  }

  /// Whether packaged libraries get their install name rewritten
  pub fn rewrites_install_name(&self) -> bool {
    matches!(self, Self::MacOs)
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
