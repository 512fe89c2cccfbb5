//! Assemble the distributable plugin tree from build output and static assets.
//!
//! Packaging is idempotent but not transactional: every step either creates a
//! missing directory or overwrites files in place, so a failed run leaves a
//! partial tree and a rerun finishes it.

mod artifacts;
mod layout;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::output_lock::{OutputLock, OutputLockError};
use crate::platform::Arch;
use crate::platform::paths::{bins_dir, output_dir};
use crate::util::hash::{ContentHash, DirHashError, hash_directory};

pub use artifacts::{ALLOWED_EXTENSIONS, ArtifactCopyRule};
pub use layout::{ASSET_TREES, AUTOLOAD_DESTINATION, AUTOLOAD_SOURCE, AssetTree, EXTENSIONS_DIR, PACKAGE_LAYOUT};

/// Errors that can occur while packaging.
#[derive(Debug, Error)]
pub enum PackageError {
  #[error("required {what} not found: {}", path.display())]
  MissingAsset { what: &'static str, path: PathBuf },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
  Copy {
    from: PathBuf,
    to: PathBuf,
    source: io::Error,
  },

  #[error("failed to copy {arch} binaries: {source}")]
  Artifacts { arch: Arch, source: io::Error },

  #[error(transparent)]
  Lock(#[from] OutputLockError),

  #[error("failed to compute package digest: {0}")]
  Digest(#[from] DirHashError),
}

/// Where to read from and write to.
#[derive(Debug, Clone)]
pub struct PackageOptions {
  /// Project root holding the static asset trees
  pub root: PathBuf,
  /// Package output root
  pub output: PathBuf,
  /// Directory holding `<arch>/release` binary output
  pub bins: PathBuf,
}

impl PackageOptions {
  /// Options using the default `output/` and `build/bin/` locations under `root`.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    let root = root.into();
    Self {
      output: output_dir(&root),
      bins: bins_dir(&root),
      root,
    }
  }
}

/// Files merged from one static asset tree.
#[derive(Debug, Clone, Serialize)]
pub struct AssetCopy {
  pub source: PathBuf,
  pub destination: PathBuf,
  pub files: usize,
}

/// Summary of a successful packaging run.
#[derive(Debug, Clone, Serialize)]
pub struct PackageResult {
  pub output: PathBuf,
  /// Layout directories, in creation order
  pub layout: Vec<PathBuf>,
  pub assets: Vec<AssetCopy>,
  /// Destination paths of copied binaries
  pub binaries: Vec<PathBuf>,
  pub packaged_archs: Vec<Arch>,
  /// Architectures with no binary output directory
  pub skipped_archs: Vec<Arch>,
  /// Digest of the finished output tree
  pub digest: ContentHash,
}

/// Build the package described by `options`.
///
/// # Errors
///
/// Returns an error if:
/// - A static asset tree or the autoload marker is missing (checked before writing anything)
/// - Another process holds the output lock
/// - Creating directories or copying files fails
pub fn package(options: &PackageOptions) -> Result<PackageResult, PackageError> {
  check_required_inputs(&options.root)?;

  let _lock = OutputLock::acquire(&options.output, "package")?;
  let output = &options.output;

  create_dir(output)?;

  let mut layout = Vec::with_capacity(PACKAGE_LAYOUT.len());
  for folder in PACKAGE_LAYOUT {
    let path = output.join(folder);
    info!(path = %path.display(), "creating folder");
    create_dir(&path)?;
    layout.push(path);
  }

  let mut assets = Vec::with_capacity(ASSET_TREES.len());
  for tree in ASSET_TREES {
    let source = options.root.join(tree.source);
    let destination = output.join(tree.destination);
    let files = merge_tree(&source, &destination)?;
    info!(source = tree.source, files, "merged asset tree");
    assets.push(AssetCopy {
      source,
      destination,
      files,
    });
  }

  let autoload_from = options.root.join(AUTOLOAD_SOURCE);
  let autoload_to = output.join(AUTOLOAD_DESTINATION);
  copy_file(&autoload_from, &autoload_to)?;

  let mut binaries = Vec::new();
  let mut packaged_archs = Vec::new();
  let mut skipped_archs = Vec::new();
  for arch in Arch::ALL {
    let rule = ArtifactCopyRule::for_arch(arch, &options.bins, output);
    match rule.apply().map_err(|e| PackageError::Artifacts { arch, source: e })? {
      Some(copied) => {
        if copied.is_empty() {
          warn!(arch = %arch, path = %rule.source.display(), "binary output directory has no shippable files");
        }
        binaries.extend(copied);
        packaged_archs.push(arch);
      }
      None => skipped_archs.push(arch),
    }
  }

  let digest = hash_directory(output, &[])?;
  info!(digest = %digest, "package complete");

  Ok(PackageResult {
    output: output.clone(),
    layout,
    assets,
    binaries,
    packaged_archs,
    skipped_archs,
    digest,
  })
}

fn check_required_inputs(root: &Path) -> Result<(), PackageError> {
  for tree in ASSET_TREES {
    let path = root.join(tree.source);
    if !path.is_dir() {
      return Err(PackageError::MissingAsset {
        what: "asset tree",
        path,
      });
    }
  }

  let autoload = root.join(AUTOLOAD_SOURCE);
  if !autoload.is_file() {
    return Err(PackageError::MissingAsset {
      what: "autoload marker",
      path: autoload,
    });
  }
  Ok(())
}

/// Create `path` and any missing parents as 0755. Existing directories are fine.
fn create_dir(path: &Path) -> Result<(), PackageError> {
  let mut builder = fs::DirBuilder::new();
  builder.recursive(true);
  #[cfg(unix)]
  {
    use std::os::unix::fs::DirBuilderExt;
    builder.mode(0o755);
  }
  builder.create(path).map_err(|e| PackageError::CreateDir {
    path: path.to_path_buf(),
    source: e,
  })
}

fn copy_file(from: &Path, to: &Path) -> Result<(), PackageError> {
  fs::copy(from, to).map(|_| ()).map_err(|e| PackageError::Copy {
    from: from.to_path_buf(),
    to: to.to_path_buf(),
    source: e,
  })
}

/// Merge `source` into `destination`, overwriting files that already exist.
///
/// Returns the number of files copied.
fn merge_tree(source: &Path, destination: &Path) -> Result<usize, PackageError> {
  let mut files = 0;

  for entry in WalkDir::new(source).follow_links(true).sort_by_file_name() {
    let entry = entry.map_err(|e| PackageError::Copy {
      from: source.to_path_buf(),
      to: destination.to_path_buf(),
      source: e.into(),
    })?;
    let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
    let target = destination.join(relative);

    if entry.file_type().is_dir() {
      create_dir(&target)?;
    } else {
      copy_file(entry.path(), &target)?;
      files += 1;
    }
  }

  Ok(files)
}
