//! Terminal output for navbot-build.
//!
//! Status lines go to stdout (success) or stderr (warnings, errors) so that
//! `--format json` leaves stdout holding nothing but the JSON document.

use std::fmt::Display;
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const ARROW: &str = "→";
}

/// Digest prefix shown in summaries; the full value is in the JSON output.
pub fn truncate_hash(hash: &str) -> &str {
  &hash[..hash.len().min(12)]
}

/// Packaging runs are short; anything under a second is shown in milliseconds.
pub fn format_duration(duration: Duration) -> String {
  if duration < Duration::from_secs(1) {
    format!("{}ms", duration.as_millis())
  } else {
    format!("{:.2}s", duration.as_secs_f64())
  }
}

/// Comma-separated listing, or `-` for an empty one.
pub fn join_or_dash<I>(items: I) -> String
where
  I: IntoIterator,
  I::Item: Display,
{
  let joined = items.into_iter().map(|item| item.to_string()).collect::<Vec<_>>().join(", ");
  if joined.is_empty() { "-".to_string() } else { joined }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

/// One indented line per item, under the preceding stat.
pub fn print_items<I>(items: I)
where
  I: IntoIterator,
  I::Item: Display,
{
  for item in items {
    println!(
      "    {} {}",
      symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.dimmed()),
      item
    );
  }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{json}");
  Ok(())
}
