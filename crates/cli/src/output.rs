//! Terminal output for the CLI.
//!
//! Stdout carries what scripts consume: command lines, plans, JSON and
//! `info` fields. Build statuses and the run summary go to stderr next to the
//! tools' own diagnostics.

use std::time::Duration;

use anyhow::Context;
use owo_colors::{OwoColorize, Stream};

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "←";
}

/// Outcome shown in front of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  Ok,
  Failed,
  Warning,
  Note,
}

impl Status {
  pub fn symbol(self) -> &'static str {
    match self {
      Status::Ok => symbols::SUCCESS,
      Status::Failed => symbols::ERROR,
      Status::Warning => symbols::WARNING,
      Status::Note => symbols::INFO,
    }
  }
}

/// Print a status line on stderr. Failures and warnings color the
/// whole line.
pub fn print_status(status: Status, message: &str) {
  let symbol = status.symbol();
  match status {
    Status::Ok => eprintln!("{} {message}", symbol.if_supports_color(Stream::Stderr, |s| s.green())),
    Status::Note => eprintln!("{} {message}", symbol.if_supports_color(Stream::Stderr, |s| s.blue())),
    Status::Failed => eprintln!(
      "{} {}",
      symbol.if_supports_color(Stream::Stderr, |s| s.red()),
      message.if_supports_color(Stream::Stderr, |s| s.red())
    ),
    Status::Warning => eprintln!(
      "{} {}",
      symbol.if_supports_color(Stream::Stderr, |s| s.yellow()),
      message.if_supports_color(Stream::Stderr, |s| s.yellow())
    ),
  }
}

/// `Built 7, failed 1, cancelled 0 in 1.20s`
pub fn summary(built: usize, failed: usize, cancelled: usize, elapsed: Duration) -> String {
  format!(
    "Built {built}, failed {failed}, cancelled {cancelled} in {}",
    format_duration(elapsed)
  )
}

/// Short wall-clock time for build reports.
pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  match secs {
    0 => format!("{}ms", duration.subsec_millis()),
    1..60 => format!("{:.2}s", duration.as_secs_f64()),
    _ => format!("{}m {}s", secs / 60, secs % 60),
  }
}

/// Print an aligned `label: value` line on stdout.
pub fn print_field(label: &str, value: &str) {
  let label = format!("{label}:");
  println!("  {:<15}{value}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()));
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{json}");
  Ok(())
}
