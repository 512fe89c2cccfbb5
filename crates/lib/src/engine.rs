//! Handoff between the configure step and the external build engine.
//!
//! The engine compiles and links; this crate only tells it what to build.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::BuildConfiguration;
use crate::consts::HANDOFF_FILENAME;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("failed to create build directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to write build configuration {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },
}

/// Something that accepts a resolved configuration and produces binaries from it.
pub trait BuildEngine {
  /// Hand the configuration over. Returns the location the engine will read it from.
  fn configure(&self, config: &BuildConfiguration) -> Result<PathBuf, EngineError>;
}

/// Writes the configuration as JSON into the build directory for the engine to pick up.
#[derive(Debug, Clone)]
pub struct HandoffFileEngine {
  build_dir: PathBuf,
}

/// On-disk shape of the handoff file.
#[derive(Debug, Serialize)]
struct Handoff<'a> {
  version: u32,
  #[serde(flatten)]
  config: &'a BuildConfiguration,
  compiler_flags: Vec<&'static str>,
  defines: Vec<&'static str>,
}

impl HandoffFileEngine {
  pub fn new(build_dir: impl Into<PathBuf>) -> Self {
    Self {
      build_dir: build_dir.into(),
    }
  }

  pub fn handoff_path(&self) -> PathBuf {
    self.build_dir.join(HANDOFF_FILENAME)
  }
}

impl BuildEngine for HandoffFileEngine {
  fn configure(&self, config: &BuildConfiguration) -> Result<PathBuf, EngineError> {
    fs::create_dir_all(&self.build_dir).map_err(|e| EngineError::CreateDir {
      path: self.build_dir.clone(),
      source: e,
    })?;

    let path = self.handoff_path();
    let handoff = Handoff {
      version: 1,
      config,
      compiler_flags: config.compiler_flags(),
      defines: config.defines(),
    };
    write_json(&path, &handoff).map_err(|e| EngineError::Write {
      path: path.clone(),
      source: e,
    })?;

    info!(path = %path.display(), "wrote build configuration");
    Ok(path)
  }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
  let file = fs::File::create(path)?;
  let mut writer = io::BufWriter::new(file);
  serde_json::to_writer_pretty(&mut writer, value).map_err(io::Error::other)?;
  writer.write_all(b"\n")?;
  writer.flush()
}
