//! Resolve command-line build options into a `BuildConfiguration`.
//!
//! Every option is optional and parsed on its own. Enum-like values (the SDK
//! selector, target list and architecture extension level) are validated here
//! so that a typo stops the configure step before any compilation happens.

mod arch_ext;
mod sdk;

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::platform::Arch;
use crate::platform::arch::UnknownArch;
use crate::platform::paths::default_sdk_root;

pub use arch_ext::ArchExtension;
pub use sdk::{KNOWN_SDKS, Sdk, SdkSelector, find_sdk};

/// Errors that can occur while resolving build options.
#[derive(Debug, Error)]
pub enum ResolveError {
  #[error("unknown SDK '{name}' (known SDKs: {known}; or use all, present, none)")]
  UnknownSdk { name: String, known: String },

  #[error("empty entry in SDK list '{value}'")]
  EmptySdkEntry { value: String },

  #[error("invalid architecture extension level {level} (expected 0-3)")]
  InvalidArchExtLevel { level: u8 },

  #[error("invalid target list '{value}': {source}")]
  InvalidTarget {
    value: String,
    #[source]
    source: UnknownArch,
  },

  #[error("target list '{value}' names no architecture")]
  EmptyTargets { value: String },

  #[error("host architecture '{host}' cannot be targeted; pass --targets explicitly")]
  UnsupportedHost { host: String },

  #[error("{what} path does not exist: {}", path.display())]
  MissingDependency { what: &'static str, path: PathBuf },
}

/// Raw options as they arrive from the command line.
///
/// Every field has a default, so `RawOptions::default()` resolves to a valid
/// configuration on a supported host.
#[derive(Debug, Clone, Default)]
pub struct RawOptions {
  /// Root search folder for `hl2sdk-*` checkouts
  pub hl2sdk_root: Option<PathBuf>,
  /// `all`, `present`, `none` or a comma-separated SDK list
  pub sdks: Option<String>,
  /// Path to Metamod:Source
  pub mms_path: Option<PathBuf>,
  /// Path to SourceMod
  pub sm_path: Option<PathBuf>,
  pub debug_symbols: bool,
  pub optimize: bool,
  pub lto: bool,
  pub sanitizer: bool,
  /// 0 = none, 1 = SSE4, 2 = AVX2, 3 = native
  pub arch_ext_level: Option<u8>,
  /// Comma-separated target architecture override
  pub targets: Option<String>,
  pub debug_mode: bool,
  pub disable_vprof: bool,
  pub symbol_upload: bool,
}

/// The fully resolved set of build options handed to the build engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfiguration {
  pub sdk_root: PathBuf,
  pub sdk_selector: SdkSelector,
  /// SDKs selected for this build
  pub sdks: Vec<&'static Sdk>,
  pub mms_path: Option<PathBuf>,
  pub sm_path: Option<PathBuf>,
  /// Ordered, without duplicates
  pub targets: Vec<Arch>,
  pub debug_symbols: bool,
  pub optimize: bool,
  pub debug_mode: bool,
  pub arch_extensions: ArchExtension,
  pub sanitizer: bool,
  pub lto: bool,
  pub disable_vprof: bool,
  pub symbol_upload: bool,
}

impl BuildConfiguration {
  /// Compiler switches implied by the resolved options.
  pub fn compiler_flags(&self) -> Vec<&'static str> {
    let mut flags = Vec::new();
    if self.debug_symbols {
      flags.push("-g");
    }
    if self.optimize {
      flags.push("-O3");
    }
    flags.extend_from_slice(self.arch_extensions.compiler_flags());
    if self.sanitizer {
      flags.extend_from_slice(&["-fsanitize=address", "-fno-omit-frame-pointer"]);
    }
    if self.lto {
      flags.push("-flto");
    }
    flags
  }

  /// Preprocessor defines implied by the resolved options.
  pub fn defines(&self) -> Vec<&'static str> {
    let mut defines = Vec::new();
    if self.debug_mode {
      defines.push("EXT_DEBUG");
    }
    if !self.disable_vprof {
      defines.push("EXT_VPROF_ENABLED");
    }
    defines
  }

  /// Whether any SDK-dependent build was requested.
  pub fn builds_sdks(&self) -> bool {
    !self.sdks.is_empty()
  }
}

/// Resolve raw options into a `BuildConfiguration`.
///
/// `source_root` is the project checkout; it anchors the default SDK root.
///
/// # Errors
///
/// Returns an error if:
/// - The SDK selector names an unknown SDK or contains an empty entry
/// - The target list is empty or names an unknown architecture
/// - No target list was given and the host architecture is unsupported
/// - The architecture extension level is outside 0-3
/// - A provided Metamod:Source or SourceMod path does not exist
pub fn resolve(raw: &RawOptions, source_root: &Path) -> Result<BuildConfiguration, ResolveError> {
  let sdk_selector = match raw.sdks.as_deref() {
    Some(value) => value.parse()?,
    None => SdkSelector::default(),
  };
  let targets = resolve_targets(raw.targets.as_deref())?;
  let arch_extensions = ArchExtension::try_from(raw.arch_ext_level.unwrap_or(0))?;
  let mms_path = check_dependency("Metamod:Source", raw.mms_path.as_deref())?;
  let sm_path = check_dependency("SourceMod", raw.sm_path.as_deref())?;

  let sdk_root = raw
    .hl2sdk_root
    .clone()
    .unwrap_or_else(|| default_sdk_root(source_root));
  debug!(root = %sdk_root.display(), selector = %sdk_selector, "resolving SDKs");
  let sdks = sdk_selector.resolve(&sdk_root);

  let config = BuildConfiguration {
    sdk_root,
    sdk_selector,
    sdks,
    mms_path,
    sm_path,
    targets,
    debug_symbols: raw.debug_symbols,
    optimize: raw.optimize,
    debug_mode: raw.debug_mode,
    arch_extensions,
    sanitizer: raw.sanitizer,
    lto: raw.lto,
    disable_vprof: raw.disable_vprof,
    symbol_upload: raw.symbol_upload,
  };

  info!(
    sdks = config.sdks.len(),
    targets = ?config.targets,
    "resolved build configuration"
  );

  Ok(config)
}

/// Parse a `--targets` override, or fall back to the host architecture.
fn resolve_targets(value: Option<&str>) -> Result<Vec<Arch>, ResolveError> {
  let Some(value) = value else {
    return Arch::current().map(|arch| vec![arch]).ok_or_else(|| ResolveError::UnsupportedHost {
      host: std::env::consts::ARCH.to_string(),
    });
  };

  let mut targets = Vec::new();
  for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
    let arch: Arch = entry.parse().map_err(|source| ResolveError::InvalidTarget {
      value: value.to_string(),
      source,
    })?;
    if !targets.contains(&arch) {
      targets.push(arch);
    }
  }

  if targets.is_empty() {
    return Err(ResolveError::EmptyTargets {
      value: value.to_string(),
    });
  }
  Ok(targets)
}

fn check_dependency(what: &'static str, path: Option<&Path>) -> Result<Option<PathBuf>, ResolveError> {
  match path {
    Some(path) if !path.exists() => Err(ResolveError::MissingDependency {
      what,
      path: path.to_path_buf(),
    }),
    Some(path) => Ok(Some(path.to_path_buf())),
    None => Ok(None),
  }
}
