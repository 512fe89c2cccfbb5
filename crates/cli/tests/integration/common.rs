//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated test environment.
///
/// Each test gets its own temporary project root, with the SDK search folder
/// kept inside it so nothing on the host leaks in.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Create an empty test environment.
  pub fn empty() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Create a project holding every static asset tree and the autoload marker.
  pub fn with_project() -> Self {
    let env = Self::empty();
    env.write_file("configs/bot_names.cfg", "\"names\" {}\n");
    env.write_file("configs/tf/class_selection.cfg", "// tf\n");
    env.write_file("gamedata/navbot.games/game.tf.txt", "\"Games\" {}\n");
    env.write_file("scripting/include/navbot.inc", "#pragma once\n");
    env.write_file("translations/navbot.phrases.txt", "\"Phrases\" {}\n");
    env.write_file("extension/navbot.autoload", "");
    env
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Project root.
  pub fn root(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap()
  }

  /// Path relative to the project root.
  pub fn path(&self, relative_path: &str) -> PathBuf {
    self.root().join(relative_path)
  }

  /// SDK search folder (isolated per test).
  pub fn sdk_root(&self) -> PathBuf {
    let p = self.temp.path().join("sdks");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Create an SDK checkout folder under the SDK root.
  pub fn add_sdk(&self, folder: &str) {
    std::fs::create_dir_all(self.sdk_root().join(folder)).unwrap();
  }

  /// Get a pre-configured Command for the navbot-build binary.
  ///
  /// `HL2SDKROOT` and `RUST_LOG` are cleared so host settings don't leak in,
  /// and git repository discovery stops at the temp directory.
  pub fn build_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("navbot-build");
    cmd.env_remove("HL2SDKROOT");
    cmd.env_remove("RUST_LOG");
    if let Some(parent) = self.root().parent() {
      cmd.env("GIT_CEILING_DIRECTORIES", parent);
    }
    cmd.current_dir(self.temp.path());
    cmd
  }
}

/// Parse JSON written to stdout.
pub fn stdout_json(output: &[u8]) -> serde_json::Value {
  serde_json::from_slice(output).unwrap_or_else(|e| panic!("stdout is not JSON: {}", e))
}

/// Read a file, panicking with the path on failure.
pub fn read(path: &Path) -> String {
  std::fs::read_to_string(path).unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e))
}
