//! Implementation of the `navbot-build configure` command.
//!
//! Resolves build flags into a configuration and hands it to the build engine.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use navbot_build_lib::config::{BuildConfiguration, RawOptions, resolve};
use navbot_build_lib::engine::{BuildEngine, HandoffFileEngine};
use navbot_build_lib::platform::paths;

use crate::output::{OutputFormat, join_or_dash, print_json, print_stat, print_success};

#[derive(Debug, Args)]
pub struct ConfigureArgs {
  /// Project checkout used to locate default paths
  #[arg(long, default_value = ".")]
  pub source_root: PathBuf,

  /// Directory the build engine works in [default: <SOURCE_ROOT>/build]
  #[arg(long)]
  pub build_dir: Option<PathBuf>,

  /// Root search folder for HL2SDKs [default: $HL2SDKROOT, else the parent of SOURCE_ROOT]
  #[arg(long)]
  pub hl2sdk_root: Option<PathBuf>,

  /// Build against specified SDKs; valid args are "all", "present", "none", or a
  /// comma-delimited list of engine names [default: present]
  #[arg(short = 's', long)]
  pub sdks: Option<String>,

  /// Path to Metamod:Source
  #[arg(long)]
  pub mms_path: Option<PathBuf>,

  /// Path to SourceMod
  #[arg(long)]
  pub sm_path: Option<PathBuf>,

  /// Enable debugging symbols
  #[arg(long = "enable-debug")]
  pub debug: bool,

  /// Enable optimization
  #[arg(long = "enable-optimize")]
  pub optimize: bool,

  /// Enable Link Time Optimization
  #[arg(long = "enable-lto")]
  pub lto: bool,

  /// Enable ASAN (clang only)
  #[arg(long = "enable-asan")]
  pub asan: bool,

  /// Instruction-set baseline: 0 = none, 1 = SSE4, 2 = AVX2, 3 = native
  #[arg(long, value_name = "LEVEL")]
  pub arch_ext_level: Option<u8>,

  /// Override the target architecture (use commas to separate multiple targets)
  #[arg(long)]
  pub targets: Option<String>,

  /// Compile with debug code
  #[arg(long)]
  pub debug_mode: bool,

  /// Compile without the optional VProf profiling API
  #[arg(long)]
  pub disable_vprof: bool,

  /// Allow uploading crash symbols after the build
  #[arg(long = "enable-symbol-upload")]
  pub symbol_upload: bool,

  /// Output format
  #[arg(long, value_enum, default_value_t)]
  pub format: OutputFormat,
}

impl ConfigureArgs {
  fn raw_options(&self) -> RawOptions {
    RawOptions {
      hl2sdk_root: self.hl2sdk_root.clone(),
      sdks: self.sdks.clone(),
      mms_path: self.mms_path.clone(),
      sm_path: self.sm_path.clone(),
      debug_symbols: self.debug,
      optimize: self.optimize,
      lto: self.lto,
      sanitizer: self.asan,
      arch_ext_level: self.arch_ext_level,
      targets: self.targets.clone(),
      debug_mode: self.debug_mode,
      disable_vprof: self.disable_vprof,
      symbol_upload: self.symbol_upload,
    }
  }
}

/// Execute the configure command.
///
/// Fails before anything is written if any flag value is invalid.
pub fn cmd_configure(args: &ConfigureArgs) -> Result<()> {
  let source_root = dunce::canonicalize(&args.source_root)
    .with_context(|| format!("Source root not found: {}", args.source_root.display()))?;

  info!(source_root = %source_root.display(), "configuring build");

  let config = resolve(&args.raw_options(), &source_root).context("Invalid build configuration")?;

  let build_dir = args
    .build_dir
    .clone()
    .unwrap_or_else(|| paths::build_dir(&source_root));
  let handoff = HandoffFileEngine::new(build_dir)
    .configure(&config)
    .context("Failed to hand the configuration to the build engine")?;
  info!(path = %handoff.display(), "wrote engine input");

  if args.format.is_json() {
    return print_json(&config);
  }

  print_summary(&config);
  print_stat("Engine input", &handoff.display().to_string());
  Ok(())
}

fn print_summary(config: &BuildConfiguration) {
  print_success("Build configured");
  println!();
  print_stat("SDK root", &config.sdk_root.display().to_string());
  let sdks = if config.builds_sdks() {
    format!(
      "{} ({})",
      join_or_dash(config.sdks.iter().map(|s| s.name)),
      config.sdk_selector
    )
  } else {
    format!("none, SDK build skipped ({})", config.sdk_selector)
  };
  print_stat("SDKs", &sdks);
  print_stat("Targets", &join_or_dash(&config.targets));
  print_stat("Arch extensions", &config.arch_extensions.to_string());
  print_stat("Compiler flags", &join_or_dash(config.compiler_flags()));
  print_stat("Defines", &join_or_dash(config.defines()));
  print_stat(
    "Symbol upload",
    if config.symbol_upload { "enabled" } else { "disabled" },
  );
}
