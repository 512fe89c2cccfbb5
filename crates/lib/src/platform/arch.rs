use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Target architectures the extension can be compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Arch {
  #[serde(rename = "x86")]
  X86,
  #[serde(rename = "x86_64")]
  X86_64,
}

impl Arch {
  /// Every architecture, in packaging order
  pub const ALL: [Arch; 2] = [Arch::X86, Arch::X86_64];

  /// Detect the host CPU architecture at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::ARCH {
      "x86" => Some(Self::X86),
      "x86_64" => Some(Self::X86_64),
      _ => None,
    }
  }

  /// Returns the identifier used on the command line and in build output paths
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86 => "x86",
      Self::X86_64 => "x86_64",
    }
  }

  /// Subfolder of the extensions directory that receives this architecture's binaries.
  ///
  /// The primary architecture lands in the extensions root, so it has none.
  pub fn package_subdir(&self) -> Option<&'static str> {
    match self {
      Self::X86 => None,
      Self::X86_64 => Some("x64"),
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Error for an architecture identifier that is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown architecture '{0}' (expected x86 or x86_64)")]
pub struct UnknownArch(pub String);

impl FromStr for Arch {
  type Err = UnknownArch;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "x86" => Ok(Self::X86),
      "x86_64" => Ok(Self::X86_64),
      other => Err(UnknownArch(other.to_string())),
    }
  }
}
