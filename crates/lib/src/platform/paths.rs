use std::path::PathBuf;

use tracing::warn;

use super::arch::Arch;
use crate::consts::D3DCOMPILER_DLL;

/// Location of the D3D shader compiler shipped with the Windows 10 SDK.
///
/// Returns `None` when `ProgramFiles(x86)` is not set, which is the case on
/// every non-Windows host, or when the SDK ships no redist for `arch`.
pub fn d3dcompiler_redist(arch: Arch) -> Option<PathBuf> {
  let program_files = std::env::var_os("ProgramFiles(x86)")?;
  let path = d3dcompiler_redist_in(PathBuf::from(program_files), arch);
  if path.is_none() {
    warn!(%arch, "no d3dcompiler redist for this architecture");
  }
  path
}

fn d3dcompiler_redist_in(program_files: PathBuf, arch: Arch) -> Option<PathBuf> {
  let sdk_arch = arch.windows_sdk_name()?;
  Some(
    program_files
      .join("Windows Kits")
      .join("10")
      .join("Redist")
      .join("D3D")
      .join(sdk_arch)
      .join(D3DCOMPILER_DLL),
  )
}
