//! Selection of compiled binaries for the package.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::layout::EXTENSIONS_DIR;
use crate::platform::Arch;
use crate::platform::paths::release_bins_dir;

/// File extensions shipped from the binary output directories.
pub const ALLOWED_EXTENSIONS: &[&str] = &["dll", "pdb", "so"];

/// Copies whitelisted files from one architecture's binary output into the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactCopyRule {
  pub arch: Arch,
  pub source: PathBuf,
  pub destination: PathBuf,
  pub allowed_extensions: &'static [&'static str],
}

impl ArtifactCopyRule {
  /// Rule for `arch`, reading from `<bins>/<arch>/release`.
  pub fn for_arch(arch: Arch, bins: &Path, output: &Path) -> Self {
    let mut destination = output.join(EXTENSIONS_DIR);
    if let Some(subdir) = arch.package_subdir() {
      destination.push(subdir);
    }
    Self {
      arch,
      source: release_bins_dir(bins, arch),
      destination,
      allowed_extensions: ALLOWED_EXTENSIONS,
    }
  }

  /// Whether `path` carries one of the allowed extensions.
  pub fn accepts(&self, path: &Path) -> bool {
    path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| self.allowed_extensions.contains(&ext))
  }

  /// Copy every accepted file directly inside the source directory.
  ///
  /// Returns `Ok(None)` when the source directory does not exist, which means
  /// this architecture was not built. Otherwise returns the copied destinations
  /// in name order.
  pub fn apply(&self) -> io::Result<Option<Vec<PathBuf>>> {
    if !self.source.is_dir() {
      info!(arch = %self.arch, path = %self.source.display(), "no binaries for architecture, skipping");
      return Ok(None);
    }

    let mut files = fs::read_dir(&self.source)?
      .map(|entry| entry.map(|e| e.path()))
      .collect::<io::Result<Vec<_>>>()?;
    files.retain(|path| path.is_file());
    files.sort();

    fs::create_dir_all(&self.destination)?;

    let mut copied = Vec::new();
    for file in files {
      let Some(name) = file.file_name() else {
        continue;
      };
      if !self.accepts(&file) {
        debug!(file = %file.display(), "not a shipped artifact, skipping");
        continue;
      }
      let dest = self.destination.join(name);
      fs::copy(&file, &dest)?;
      info!(arch = %self.arch, file = %dest.display(), "copied binary");
      copied.push(dest);
    }

    Ok(Some(copied))
  }
}
