//! Source-control revision lookup.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

/// Anything that can report the current commit identifier.
pub trait RevisionSource {
  /// The most recent commit on the current checkout, or `None` if it cannot be determined.
  fn head_revision(&self) -> Option<String>;
}

/// Asks the `git` command-line tool for the latest commit.
#[derive(Debug, Clone)]
pub struct GitCli {
  program: OsString,
  repo_dir: PathBuf,
}

impl GitCli {
  pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
    Self {
      program: OsString::from("git"),
      repo_dir: repo_dir.into(),
    }
  }

  /// Use a different executable in place of `git`
  pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
    self.program = program.into();
    self
  }

  pub fn repo_dir(&self) -> &Path {
    &self.repo_dir
  }
}

impl RevisionSource for GitCli {
  fn head_revision(&self) -> Option<String> {
    let output = Command::new(&self.program)
      .args(["log", "--pretty=format:%H", "-n", "1"])
      .current_dir(&self.repo_dir)
      .output();

    let output = match output {
      Ok(output) => output,
      Err(e) => {
        warn!(program = ?self.program, error = %e, "could not run git");
        return None;
      }
    };

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      warn!(code = ?output.status.code(), stderr = %stderr.trim(), "git log failed");
      return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let revision = stdout.trim();
    debug!(revision, "git log output");
    parse_revision(revision)
  }
}

/// Accept only a non-empty hexadecimal identifier.
pub fn parse_revision(raw: &str) -> Option<String> {
  let revision = raw.trim();
  if revision.is_empty() {
    warn!("git returned no commit");
    return None;
  }
  if !revision.chars().all(|c| c.is_ascii_hexdigit()) {
    warn!(revision, "ignoring malformed commit identifier");
    return None;
  }
  Some(revision.to_string())
}
