//! Names and fixed paths shared by the configure, package and stamp steps.

/// File the build engine reads the resolved configuration from.
pub const HANDOFF_FILENAME: &str = "navbot-build.json";

/// Environment variable consulted for the SDK root when no flag is given.
pub const SDK_ROOT_ENV: &str = "HL2SDKROOT";

/// Directory (relative to the project root) that receives the package.
pub const OUTPUT_DIR: &str = "output";

/// Directory (relative to the project root) holding compiled binaries.
pub const BINS_DIR: &str = "build/bin";

/// Build-type folder below each architecture's binary directory.
pub const RELEASE_DIR: &str = "release";

/// Directory (relative to the project root) for the generated version header.
pub const VERSION_INCLUDE_DIR: &str = "versioning/include";

/// Generated version header file name.
pub const VERSION_HEADER: &str = "auto_version.h";

/// Value written in place of a commit hash when source control is unavailable.
pub const NO_REVISION: &str = "NONE";

/// Number of characters kept for the short commit hash.
pub const SHORT_HASH_LEN: usize = 8;
