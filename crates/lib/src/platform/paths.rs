//! Default locations derived from the project root.

use std::path::{Path, PathBuf};

use crate::consts::{BINS_DIR, OUTPUT_DIR, SDK_ROOT_ENV, VERSION_INCLUDE_DIR};
use crate::platform::Arch;

/// Returns the folder searched for `hl2sdk-*` checkouts.
///
/// `HL2SDKROOT` takes precedence; otherwise the SDKs are expected next to the
/// project checkout.
pub fn default_sdk_root(source_root: &Path) -> PathBuf {
  if let Some(root) = std::env::var_os(SDK_ROOT_ENV).filter(|v| !v.is_empty()) {
    return PathBuf::from(root);
  }
  source_root
    .parent()
    .map(Path::to_path_buf)
    .unwrap_or_else(|| source_root.to_path_buf())
}

/// Returns the directory the build engine works in
pub fn build_dir(source_root: &Path) -> PathBuf {
  source_root.join("build")
}

/// Returns the package output root
pub fn output_dir(root: &Path) -> PathBuf {
  root.join(OUTPUT_DIR)
}

/// Returns the directory holding per-architecture binary output
pub fn bins_dir(root: &Path) -> PathBuf {
  root.join(BINS_DIR)
}

/// Returns `<bins>/<arch>/release`, where the build engine leaves release binaries
pub fn release_bins_dir(bins: &Path, arch: Arch) -> PathBuf {
  bins.join(arch.as_str()).join(crate::consts::RELEASE_DIR)
}

/// Returns the directory the version header is generated into
pub fn version_include_dir(root: &Path) -> PathBuf {
  root.join(VERSION_INCLUDE_DIR)
}
