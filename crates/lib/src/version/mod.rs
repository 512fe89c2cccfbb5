//! Generate the version header embedding the current commit.
//!
//! Stamping never blocks a build: when the commit cannot be determined the
//! header is still written, with `NONE` in place of both hashes.

mod git;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::consts::{NO_REVISION, SHORT_HASH_LEN, VERSION_HEADER};

pub use git::{GitCli, RevisionSource, parse_revision};

#[derive(Debug, Error)]
pub enum StampError {
  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: io::Error },
}

/// Commit identifiers written into the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionStamp {
  pub full_hash: String,
  pub short_hash: String,
}

impl VersionStamp {
  /// Build a stamp from a looked-up revision, substituting `NONE` when absent.
  pub fn from_revision(revision: Option<String>) -> Self {
    let full_hash = revision.unwrap_or_else(|| NO_REVISION.to_string());
    let short_hash = full_hash.chars().take(SHORT_HASH_LEN).collect();
    Self { full_hash, short_hash }
  }

  /// Whether a real commit was found
  pub fn has_revision(&self) -> bool {
    self.full_hash != NO_REVISION
  }

  /// The C header text defining `GIT_COMMIT_HASH` and `GIT_COMMIT_SHORT_HASH`.
  pub fn render_header(&self) -> String {
    format!(
      "#ifndef NAVBOT_VERSIONING_H_\n\
       #define NAVBOT_VERSIONING_H_\n\
       \n\
       #define GIT_COMMIT_HASH \"{}\" // git commit hash or NONE if generated outside a git clone\n\
       #define GIT_COMMIT_SHORT_HASH \"{}\" // shorter commit hash\n\
       \n\
       #endif // !NAVBOT_VERSIONING_H_\n",
      self.full_hash, self.short_hash
    )
  }
}

/// Result of a stamping run.
#[derive(Debug, Clone, Serialize)]
pub struct StampResult {
  pub header: PathBuf,
  pub stamp: VersionStamp,
}

/// Query `source` and (re)write `<output_dir>/auto_version.h`.
///
/// The header is overwritten on every call, even if unchanged.
///
/// # Errors
///
/// Only filesystem failures are errors; a failed revision lookup is not.
pub fn stamp(source: &dyn RevisionSource, output_dir: &Path) -> Result<StampResult, StampError> {
  fs::create_dir_all(output_dir).map_err(|e| StampError::CreateDir {
    path: output_dir.to_path_buf(),
    source: e,
  })?;

  let stamp = VersionStamp::from_revision(source.head_revision());
  let header = output_dir.join(VERSION_HEADER);
  fs::write(&header, stamp.render_header()).map_err(|e| StampError::WriteFile {
    path: header.clone(),
    source: e,
  })?;

  info!(path = %header.display(), hash = %stamp.short_hash, "generated version header");
  Ok(StampResult { header, stamp })
}
