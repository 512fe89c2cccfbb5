//! Test fixtures for the packaging and stamping steps.

use std::fs;
use std::path::{Path, PathBuf};

use crate::platform::Arch;
use crate::platform::paths::{bins_dir, release_bins_dir};

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(&path, content).unwrap();
  path
}

/// Lay out the static asset trees and the autoload marker of a project checkout.
pub fn create_project(root: &Path) {
  write_file(root, "configs/bot_names.cfg", "\"BotNames\" {}\n");
  write_file(root, "configs/tf/class_selection.cfg", "\"ClassSelection\" {}\n");
  write_file(root, "gamedata/navbot.games/game.tf.txt", "\"Games\" {}\n");
  write_file(root, "scripting/navbot_admin.sp", "#include <navbot>\n");
  write_file(root, "scripting/include/navbot.inc", "native int NavBot_Version();\n");
  write_file(root, "translations/navbot.phrases.txt", "\"Phrases\" {}\n");
  write_file(root, "extension/navbot.autoload", "");
}

/// Drop files into `<root>/build/bin/<arch>/release`.
pub fn write_bins(root: &Path, arch: Arch, files: &[(&str, &str)]) -> PathBuf {
  let dir = release_bins_dir(&bins_dir(root), arch);
  fs::create_dir_all(&dir).unwrap();
  for (name, content) in files {
    fs::write(dir.join(name), content).unwrap();
  }
  dir
}
