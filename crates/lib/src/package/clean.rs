//! Destructive output directory reset.
//!
//! Removal that fails with a permission error (read-only entries, as left by
//! some SDK copies on Windows) is retried exactly once after write permission
//! has been restored across the tree. Any other failure, and a failing retry,
//! is returned to the caller.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

/// Remove `path` with everything below it and recreate it empty.
///
/// A missing `path` is simply created.
pub fn reset_dir(path: &Path) -> std::io::Result<()> {
  std::fs::create_dir_all(path)?;

  match std::fs::remove_dir_all(path) {
    Ok(()) => {}
    Err(e) if e.kind() == ErrorKind::PermissionDenied => {
      warn!(path = %path.display(), error = %e, "removal denied, restoring write permission and retrying");
      make_writable(path);
      std::fs::remove_dir_all(path)?;
    }
    Err(e) => return Err(e),
  }

  std::fs::create_dir_all(path)
}

/// Restore write permission on `path` and everything below it.
///
/// Best-effort: entries that cannot be updated are logged and skipped; the
/// removal retry reports whatever is still in the way.
fn make_writable(path: &Path) {
  debug!(path = %path.display(), "making tree writable");

  // Pre-order so directories become enterable before their contents are visited.
  for entry in WalkDir::new(path) {
    match entry {
      Ok(entry) => {
        if let Err(e) = make_entry_writable(entry.path()) {
          warn!(path = %entry.path().display(), error = %e, "failed to make writable, continuing");
        }
      }
      Err(e) => warn!(error = %e, "failed to traverse, continuing"),
    }
  }
}

#[cfg(unix)]
fn make_entry_writable(path: &Path) -> std::io::Result<()> {
  use std::os::unix::fs::PermissionsExt;

  let metadata = std::fs::symlink_metadata(path)?;
  if metadata.file_type().is_symlink() {
    return Ok(());
  }

  let mut perms = metadata.permissions();
  // Directories also need search permission to be emptied.
  let extra = if metadata.is_dir() { 0o700 } else { 0o200 };
  perms.set_mode(perms.mode() | extra);
  std::fs::set_permissions(path, perms)
}

#[cfg(windows)]
fn make_entry_writable(path: &Path) -> std::io::Result<()> {
  let metadata = std::fs::symlink_metadata(path)?;
  let mut perms = metadata.permissions();
  if perms.readonly() {
    #[allow(clippy::permissions_set_readonly_false)]
    perms.set_readonly(false);
    std::fs::set_permissions(path, perms)?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;
  #[cfg(unix)]
  use tracing_test::traced_test;

  /// Whether the read-only `dir` actually refuses writes. Privileged users
  /// bypass the mode bits, which makes the denial paths unreachable.
  #[cfg(unix)]
  fn denies_writes(dir: &Path) -> bool {
    let check = dir.join(".write-check");
    let denied = fs::write(&check, "").is_err();
    let _ = fs::remove_file(&check);
    denied
  }

  #[test]
  fn creates_missing_directory() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("a").join("out");

    reset_dir(&target).unwrap();

    assert!(target.is_dir());
    assert_eq!(fs::read_dir(&target).unwrap().count(), 0);
  }

  #[test]
  fn clears_existing_contents() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out");
    fs::create_dir_all(target.join("include/EGL")).unwrap();
    fs::write(target.join("include/EGL/stale.h"), "stale").unwrap();
    fs::write(target.join("extra.txt"), "extra").unwrap();

    reset_dir(&target).unwrap();

    assert!(target.is_dir());
    assert_eq!(fs::read_dir(&target).unwrap().count(), 0);
  }

  #[test]
  fn removes_read_only_entries() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out");
    let locked = target.join("lib");
    fs::create_dir_all(&locked).unwrap();
    let file = locked.join("libEGL.dll");
    fs::write(&file, "bin").unwrap();

    let mut perms = fs::metadata(&file).unwrap().permissions();
    perms.set_readonly(true);
    fs::set_permissions(&file, perms).unwrap();
    let mut perms = fs::metadata(&locked).unwrap().permissions();
    perms.set_readonly(true);
    fs::set_permissions(&locked, perms).unwrap();

    reset_dir(&target).unwrap();

    assert!(target.is_dir());
    assert!(!locked.exists());
  }

  #[test]
  #[cfg(unix)]
  #[traced_test]
  fn denied_removal_is_retried_after_restoring_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out");
    let locked = target.join("include");
    fs::create_dir_all(&locked).unwrap();
    fs::write(locked.join("egl.h"), "x").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();
    if !denies_writes(&locked) {
      return;
    }

    reset_dir(&target).unwrap();

    assert!(logs_contain("removal denied"));
    assert!(target.is_dir());
    assert!(!locked.exists());
  }

  #[test]
  #[cfg(unix)]
  fn failed_retry_is_returned() {
    use std::os::unix::fs::PermissionsExt;

    // The parent stays read-only: only the tree under `target` is made
    // writable, so `target` itself can never be unlinked.
    let temp = TempDir::new().unwrap();
    let parent = temp.path().join("build");
    let target = parent.join("out");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("stale.h"), "x").unwrap();
    fs::set_permissions(&parent, fs::Permissions::from_mode(0o555)).unwrap();
    if !denies_writes(&parent) {
      fs::set_permissions(&parent, fs::Permissions::from_mode(0o755)).unwrap();
      return;
    }

    let result = reset_dir(&target);
    fs::set_permissions(&parent, fs::Permissions::from_mode(0o755)).unwrap();

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
  }

  #[test]
  #[cfg(unix)]
  fn make_writable_restores_owner_write() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("dir");
    fs::create_dir(&dir).unwrap();
    let file = dir.join("file.h");
    fs::write(&file, "x").unwrap();
    fs::set_permissions(&file, fs::Permissions::from_mode(0o444)).unwrap();
    fs::set_permissions(&dir, fs::Permissions::from_mode(0o555)).unwrap();

    make_writable(&dir);

    assert_eq!(fs::metadata(&dir).unwrap().permissions().mode() & 0o700, 0o700);
    assert_eq!(fs::metadata(&file).unwrap().permissions().mode() & 0o200, 0o200);
  }
}
