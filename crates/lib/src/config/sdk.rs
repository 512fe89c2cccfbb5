//! Known game SDKs and the selector that picks which of them to build.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use super::ResolveError;

/// A game SDK the extension knows how to compile against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Sdk {
  /// Name accepted by `--sdks`
  pub name: &'static str,
  /// Checkout folder under the SDK root
  pub folder: &'static str,
  /// Preprocessor define identifying the engine branch
  pub define: &'static str,
}

impl Sdk {
  /// Location of this SDK's checkout under `sdk_root`
  pub fn path(&self, sdk_root: &Path) -> PathBuf {
    sdk_root.join(self.folder)
  }

  /// Whether a checkout exists under `sdk_root`
  pub fn is_present(&self, sdk_root: &Path) -> bool {
    self.path(sdk_root).is_dir()
  }
}

pub const KNOWN_SDKS: &[Sdk] = &[
  Sdk {
    name: "tf2",
    folder: "hl2sdk-tf2",
    define: "SE_TF2",
  },
  Sdk {
    name: "css",
    folder: "hl2sdk-css",
    define: "SE_CSS",
  },
  Sdk {
    name: "dods",
    folder: "hl2sdk-dods",
    define: "SE_DODS",
  },
  Sdk {
    name: "hl2dm",
    folder: "hl2sdk-hl2dm",
    define: "SE_HL2DM",
  },
  Sdk {
    name: "sdk2013",
    folder: "hl2sdk-sdk2013",
    define: "SE_SDK2013",
  },
  Sdk {
    name: "bms",
    folder: "hl2sdk-bms",
    define: "SE_BMS",
  },
];

/// Looks up a known SDK by its `--sdks` name
pub fn find_sdk(name: &str) -> Option<&'static Sdk> {
  KNOWN_SDKS.iter().find(|sdk| sdk.name == name)
}

/// Which SDKs to build against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SdkSelector {
  /// Every known SDK
  All,
  /// Only SDKs with a checkout under the SDK root
  #[default]
  Present,
  /// Skip the SDK-dependent build entirely
  None,
  /// The named subset, in the order given
  Explicit(Vec<&'static Sdk>),
}

impl SdkSelector {
  /// Resolves the selector to a concrete SDK list.
  ///
  /// Only `Present` looks at the filesystem.
  pub fn resolve(&self, sdk_root: &Path) -> Vec<&'static Sdk> {
    match self {
      SdkSelector::All => {
        for sdk in KNOWN_SDKS.iter().filter(|sdk| !sdk.is_present(sdk_root)) {
          warn!(sdk = sdk.name, path = %sdk.path(sdk_root).display(), "SDK selected but not found on disk");
        }
        KNOWN_SDKS.iter().collect()
      }
      SdkSelector::Present => {
        let found: Vec<&'static Sdk> = KNOWN_SDKS.iter().filter(|sdk| sdk.is_present(sdk_root)).collect();
        if found.is_empty() {
          warn!(root = %sdk_root.display(), "no SDKs found under SDK root");
        }
        for sdk in &found {
          debug!(sdk = sdk.name, "found SDK");
        }
        found
      }
      SdkSelector::None => Vec::new(),
      SdkSelector::Explicit(sdks) => sdks.clone(),
    }
  }
}

impl FromStr for SdkSelector {
  type Err = ResolveError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "all" => return Ok(SdkSelector::All),
      "present" => return Ok(SdkSelector::Present),
      "none" => return Ok(SdkSelector::None),
      _ => {}
    }

    let mut sdks: Vec<&'static Sdk> = Vec::new();
    for entry in s.split(',').map(str::trim) {
      if entry.is_empty() {
        return Err(ResolveError::EmptySdkEntry { value: s.to_string() });
      }
      let sdk = find_sdk(entry).ok_or_else(|| ResolveError::UnknownSdk {
        name: entry.to_string(),
        known: known_sdk_names(),
      })?;
      if !sdks.contains(&sdk) {
        sdks.push(sdk);
      }
    }
    Ok(SdkSelector::Explicit(sdks))
  }
}

impl fmt::Display for SdkSelector {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SdkSelector::All => write!(f, "all"),
      SdkSelector::Present => write!(f, "present"),
      SdkSelector::None => write!(f, "none"),
      SdkSelector::Explicit(sdks) => {
        let names: Vec<&str> = sdks.iter().map(|sdk| sdk.name).collect();
        write!(f, "{}", names.join(","))
      }
    }
  }
}

impl Serialize for SdkSelector {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

fn known_sdk_names() -> String {
  KNOWN_SDKS.iter().map(|sdk| sdk.name).collect::<Vec<_>>().join(", ")
}
