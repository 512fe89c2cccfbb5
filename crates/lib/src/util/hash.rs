//! Deterministic content digests for produced directory trees.
//!
//! A package digest covers file contents, directory structure and symlink
//! targets. Timestamps and permissions are ignored, so two packaging runs
//! over the same inputs produce the same digest.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use walkdir::WalkDir;

/// Lowercase hex SHA-256.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ContentHash(pub String);

impl ContentHash {
  fn from_hasher(hasher: Sha256) -> Self {
    Self(format!("{:x}", hasher.finalize()))
  }
}

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

#[derive(Debug, Error)]
pub enum DirHashError {
  #[error("failed to walk {}: {source}", root.display())]
  Walk {
    root: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error("failed to read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Digest everything below `root`.
///
/// Entries named in `exclude` are skipped at any depth, together with their
/// contents. Each entry contributes one record keyed by its forward-slash
/// relative path, so the result does not depend on the host's separator.
pub fn hash_directory(root: &Path, exclude: &[&str]) -> Result<ContentHash, DirHashError> {
  let mut hasher = Sha256::new();

  let walker = WalkDir::new(root)
    .min_depth(1)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|entry| !entry.file_name().to_str().is_some_and(|name| exclude.contains(&name)));

  for entry in walker {
    let entry = entry.map_err(|source| DirHashError::Walk {
      root: root.to_path_buf(),
      source,
    })?;
    let relative = entry
      .path()
      .strip_prefix(root)
      .unwrap_or(entry.path())
      .to_string_lossy()
      .replace('\\', "/");

    let kind = entry.file_type();
    let record = if kind.is_dir() {
      format!("dir {relative}\n")
    } else if kind.is_symlink() {
      let target = fs::read_link(entry.path()).map_err(|source| DirHashError::Read {
        path: entry.path().to_path_buf(),
        source,
      })?;
      format!("link {relative} -> {}\n", target.to_string_lossy().replace('\\', "/"))
    } else if kind.is_file() {
      format!("file {relative} {}\n", hash_file(entry.path())?)
    } else {
      continue;
    };
    hasher.update(record.as_bytes());
  }

  Ok(ContentHash::from_hasher(hasher))
}

/// Digest a single file's contents.
pub fn hash_file(path: &Path) -> Result<ContentHash, DirHashError> {
  let read_err = |source| DirHashError::Read {
    path: path.to_path_buf(),
    source,
  };
  let mut file = File::open(path).map_err(read_err)?;
  let mut hasher = Sha256::new();
  io::copy(&mut file, &mut hasher).map_err(read_err)?;
  Ok(ContentHash::from_hasher(hasher))
}
