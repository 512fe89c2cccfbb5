use std::fmt;

use serde::Serialize;

use super::ResolveError;

/// Instruction-set baseline the compiler may assume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchExtension {
  #[default]
  None,
  Sse4,
  Avx2,
  Native,
}

impl ArchExtension {
  /// The numeric level accepted by `--arch-ext-level`
  pub fn level(&self) -> u8 {
    match self {
      Self::None => 0,
      Self::Sse4 => 1,
      Self::Avx2 => 2,
      Self::Native => 3,
    }
  }

  /// Compiler switches enabling this baseline
  pub fn compiler_flags(&self) -> &'static [&'static str] {
    match self {
      Self::None => &[],
      Self::Sse4 => &["-msse4.2"],
      Self::Avx2 => &["-mavx2", "-mfma"],
      Self::Native => &["-march=native"],
    }
  }
}

impl TryFrom<u8> for ArchExtension {
  type Error = ResolveError;

  fn try_from(level: u8) -> Result<Self, Self::Error> {
    match level {
      0 => Ok(Self::None),
      1 => Ok(Self::Sse4),
      2 => Ok(Self::Avx2),
      3 => Ok(Self::Native),
      other => Err(ResolveError::InvalidArchExtLevel { level: other }),
    }
  }
}

impl fmt::Display for ArchExtension {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::None => "none",
      Self::Sse4 => "SSE4",
      Self::Avx2 => "AVX2",
      Self::Native => "native",
    };
    write!(f, "{name}")
  }
}
