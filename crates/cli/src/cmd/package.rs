//! Implementation of the `navbot-build package` command.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use navbot_build_lib::package::{PackageOptions, PackageResult, package};

use crate::output::{
  OutputFormat, format_duration, join_or_dash, print_items, print_json, print_stat, print_success, print_warning,
  truncate_hash,
};

/// Execute the package command.
///
/// Lays out `<root>/output` (or `output`) from the project's static assets and
/// the release binaries found under `<root>/build/bin` (or `bins`).
pub fn cmd_package(root: &Path, output: Option<PathBuf>, bins: Option<PathBuf>, format: OutputFormat) -> Result<()> {
  let start = Instant::now();

  let root = dunce::canonicalize(root).with_context(|| format!("Project root not found: {}", root.display()))?;
  let mut options = PackageOptions::new(&root);
  if let Some(output) = output {
    options.output = output;
  }
  if let Some(bins) = bins {
    options.bins = bins;
  }

  info!(
    root = %root.display(),
    output = %options.output.display(),
    bins = %options.bins.display(),
    "packaging"
  );
  let result = package(&options).context("Packaging failed")?;

  if format.is_json() {
    return print_json(&result);
  }

  print_summary(&result, start);
  Ok(())
}

fn print_summary(result: &PackageResult, start: Instant) {
  print_success(&format!(
    "Package created at {} ({})",
    result.output.display(),
    format_duration(start.elapsed())
  ));
  println!();

  let files: usize = result.assets.iter().map(|a| a.files).sum();
  print_stat("Asset files", &files.to_string());
  print_stat("Architectures", &join_or_dash(&result.packaged_archs));
  print_items(result.binaries.iter().map(|b| b.display()));
  print_stat("Digest", truncate_hash(&result.digest.0));

  for arch in &result.skipped_archs {
    print_warning(&format!("No release binaries for {}, skipped", arch));
  }
}
