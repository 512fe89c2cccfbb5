//! Implementation of the `navbot-build stamp` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use navbot_build_lib::platform::paths;
use navbot_build_lib::version::{GitCli, stamp};

use crate::output::{print_stat, print_success, print_warning};

/// Execute the stamp command.
///
/// A repository without a readable HEAD still gets a header, stamped `NONE`.
pub fn cmd_stamp(root: &Path, output_dir: Option<PathBuf>) -> Result<()> {
  let output_dir = output_dir.unwrap_or_else(|| paths::version_include_dir(root));

  debug!(root = %root.display(), output_dir = %output_dir.display(), "stamping version header");
  let result = stamp(&GitCli::new(root), &output_dir).context("Failed to write version header")?;

  if result.stamp.has_revision() {
    print_success(&format!("Version header stamped at {}", result.stamp.short_hash));
  } else {
    print_warning("No git revision found, version header stamped NONE");
  }
  print_stat("Header", &result.header.display().to_string());
  Ok(())
}
