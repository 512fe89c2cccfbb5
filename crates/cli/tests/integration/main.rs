//! Integration tests for navbot-build.
//!
//! Each test runs the binary against an isolated temporary project.

mod common;
mod configure_tests;
mod package_tests;
