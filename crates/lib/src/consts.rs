/// File in the invocation directory holding the pinned ANGLE revision.
pub const REVISION_FILE: &str = "commit.txt";

pub const BUILD_DIR: &str = "build";
pub const TOOLCHAIN_DIR: &str = "depot_tools";
pub const SOURCE_DIR: &str = "angle";
pub const OUTPUT_DIR: &str = "angle.out";

pub const DEPOT_TOOLS_URL: &str = "https://chromium.googlesource.com/chromium/tools/depot_tools.git";
pub const ANGLE_URL: &str = "https://chromium.googlesource.com/angle/angle";

/// Set to `0` so depot_tools does not try to fetch Google's hermetic Windows toolchain.
pub const WIN_TOOLCHAIN_ENV: &str = "DEPOT_TOOLS_WIN_TOOLCHAIN";

/// Ninja targets producing the two shared libraries.
pub const BUILD_TARGETS: [&str; 2] = ["libEGL", "libGLESv2"];

pub const D3DCOMPILER_DLL: &str = "d3dcompiler_47.dll";
