//! Shared utilities.
//!
//! Directory digests and test fixtures.

pub mod hash;

#[cfg(test)]
pub mod testutil;
