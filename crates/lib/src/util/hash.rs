//! Output tree digests.
//!
//! - `ContentHash`: a full 64-character SHA-256
//! - `hash_directory()`: deterministic digest of a packaged tree
//! - `hash_file()`: single file digest
//!
//! Two runs that package the same revision and config produce the same
//! digest, on any host: paths are hashed with `/` separators and only file
//! contents and tree structure are included.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

/// A full 64-character SHA-256 hash, lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContentHash(pub String);

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Error during directory hashing.
#[derive(Debug, thiserror::Error)]
pub enum DirHashError {
  #[error("failed to walk directory: {0}")]
  WalkDir(#[from] walkdir::Error),

  #[error("failed to read file {path}: {source}")]
  ReadFile {
    path: String,
    #[source]
    source: std::io::Error,
  },
}

/// Compute a deterministic hash of a directory's contents.
///
/// The hash covers file contents and directory structure, not metadata like
/// timestamps or permissions. Entries are sorted by path.
pub fn hash_directory(path: &Path) -> Result<ContentHash, DirHashError> {
  let mut entries: Vec<(String, String)> = Vec::new();

  for entry in WalkDir::new(path).sort_by_file_name() {
    let entry = entry?;
    let entry_path = entry.path();

    let rel_path = match entry_path.strip_prefix(path) {
      Ok(rel) if !rel.as_os_str().is_empty() => rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"),
      // Skip the root directory itself
      _ => continue,
    };

    let file_type = entry.file_type();
    let entry_hash = if file_type.is_file() {
      format!("F:{}:{}", rel_path, hash_file(entry_path)?)
    } else if file_type.is_dir() {
      format!("D:{}", rel_path)
    } else {
      continue;
    };

    entries.push((rel_path, entry_hash));
  }

  entries.sort_by(|a, b| a.0.cmp(&b.0));

  let mut hasher = Sha256::new();
  for (_, entry_hash) in entries {
    hasher.update(entry_hash.as_bytes());
    hasher.update(b"\n");
  }

  Ok(ContentHash(format!("{:x}", hasher.finalize())))
}

/// Hash a single file's contents.
pub fn hash_file(path: &Path) -> Result<ContentHash, DirHashError> {
  let read_err = |e| DirHashError::ReadFile {
    path: path.display().to_string(),
    source: e,
  };

  let mut file = fs::File::open(path).map_err(read_err)?;
  let mut hasher = Sha256::new();
  let mut buffer = [0u8; 8192];

  loop {
    let bytes_read = file.read(&mut buffer).map_err(read_err)?;
    if bytes_read == 0 {
      break;
    }
    hasher.update(&buffer[..bytes_read]);
  }

  Ok(ContentHash(format!("{:x}", hasher.finalize())))
}
