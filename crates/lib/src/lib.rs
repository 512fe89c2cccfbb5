//! navbot-build-lib: configure, package and version-stamp the NavBot extension
//!
//! The three steps run as separate invocations and share no state:
//! - `config`: resolve command-line options into a `BuildConfiguration` for the build engine
//! - `package`: lay out the distributable `addons/sourcemod` tree from assets and binaries
//! - `version`: write the header carrying the current commit hash

pub mod config;
pub mod consts;
pub mod engine;
pub mod output_lock;
pub mod package;
pub mod platform;
pub mod util;
pub mod version;
