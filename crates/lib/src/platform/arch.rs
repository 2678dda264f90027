use serde::Serialize;
use std::fmt;

/// CPU architecture of the host
///
/// Only the Windows d3dcompiler lookup depends on it, so unlisted
/// architectures are carried as `Other` rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
  X86_64,
  Aarch64,
  Other,
}

impl Arch {
  /// Detect the current CPU architecture at runtime
  pub fn current() -> Self {
    Self::from_name(std::env::consts::ARCH)
  }

  /// Map a `std::env::consts::ARCH` value to a variant
  pub fn from_name(name: &str) -> Self {
    match name {
      "x86_64" => Self::X86_64,
      "aarch64" => Self::Aarch64,
      _ => Self::Other,
    }
  }

  /// Returns the lowercase string identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::Aarch64 => "aarch64",
      Self::Other => "unknown",
    }
  }

  /// Directory name used by the Windows SDK redistributables
  pub fn windows_sdk_name(&self) -> Option<&'static str> {
    match self {
      Self::X86_64 => Some("x64"),
      Self::Aarch64 => Some("arm64"),
      Self::Other => None,
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unlisted_architectures_are_kept() {
    for name in ["x86", "riscv64", "powerpc64", "arm"] {
      let arch = Arch::from_name(name);
      assert_eq!(arch, Arch::Other, "{name}");
      assert_eq!(arch.windows_sdk_name(), None);
    }
    assert_eq!(Arch::from_name("aarch64").windows_sdk_name(), Some("arm64"));
  }
}
