mod cmd;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::ConfigureArgs;
use output::{OutputFormat, print_error};

/// navbot-build - configure, package and version-stamp the NavBot extension
#[derive(Parser)]
#[command(name = "navbot-build")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve build options and hand them to the build engine
  Configure(ConfigureArgs),

  /// Assemble the distributable package from assets and release binaries
  Package {
    /// Project root
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Package output root [default: <ROOT>/output]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Binary output root holding <arch>/release [default: <ROOT>/build/bin]
    #[arg(long)]
    bins: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Write the version header for the current commit
  Stamp {
    /// Repository root
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Header directory [default: <ROOT>/versioning/include]
    #[arg(long)]
    output_dir: Option<PathBuf>,
  },
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Configure(args) => cmd::cmd_configure(&args),
    Commands::Package {
      root,
      output,
      bins,
      format,
    } => cmd::cmd_package(&root, output, bins, format),
    Commands::Stamp { root, output_dir } => cmd::cmd_stamp(&root, output_dir),
  };

  if let Err(e) = result {
    print_error(&format!("{e:#}"));
    std::process::exit(1);
  }
}
