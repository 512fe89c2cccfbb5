//! Fixed shape of the distributable tree.

/// Directories created (with parents) before anything is copied, in order.
pub const PACKAGE_LAYOUT: &[&str] = &[
  "addons/sourcemod/configs/navbot/",
  "addons/sourcemod/configs/navbot/tf/",
  "addons/sourcemod/gamedata/navbot.games",
  "addons/sourcemod/extensions/x64/",
  "addons/sourcemod/scripting/include",
  "addons/sourcemod/translations/",
];

/// Extensions directory; primary-architecture binaries land here.
pub const EXTENSIONS_DIR: &str = "addons/sourcemod/extensions";

/// A static asset tree merged into the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetTree {
  /// Source directory, relative to the project root
  pub source: &'static str,
  /// Destination directory, relative to the output root
  pub destination: &'static str,
}

pub const ASSET_TREES: &[AssetTree] = &[
  AssetTree {
    source: "configs",
    destination: "addons/sourcemod/configs/navbot",
  },
  AssetTree {
    source: "gamedata",
    destination: "addons/sourcemod/gamedata",
  },
  AssetTree {
    source: "scripting",
    destination: "addons/sourcemod/scripting",
  },
  AssetTree {
    source: "translations",
    destination: "addons/sourcemod/translations",
  },
];

/// Autoload marker source, relative to the project root.
pub const AUTOLOAD_SOURCE: &str = "extension/navbot.autoload";

/// Autoload marker destination, relative to the output root.
pub const AUTOLOAD_DESTINATION: &str = "addons/sourcemod/extensions/navbot.autoload";
