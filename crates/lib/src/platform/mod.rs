pub mod arch;
pub mod os;
pub mod paths;

use arch::Arch;
use os::Os;
use serde::Serialize;
use std::fmt;

/// Host platform identifier combining architecture and OS (e.g., "aarch64-darwin")
///
/// The pipeline receives this explicitly rather than probing the host, so a
/// Windows run can be exercised from any machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Platform {
  pub arch: Arch,
  pub os: Os,
}

impl Platform {
  /// Create a new platform identifier
  pub fn new(arch: Arch, os: Os) -> Self {
    Self { arch, os }
  }

  /// Detect the current platform at runtime
  pub fn current() -> Self {
    Self {
      arch: Arch::current(),
      os: Os::current(),
    }
  }

  /// Returns the platform triple string (e.g., "aarch64-darwin")
  pub fn triple(&self) -> String {
    format!("{}-{}", self.arch, self.os)
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.triple())
  }
}
