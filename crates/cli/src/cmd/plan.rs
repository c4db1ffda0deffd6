//! Implementation of the `construct plan` command.
//!
//! Evaluates the build script and prints the command each build would run,
//! without running anything.

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};

use construct_lib::execute;

use crate::cmd::ScriptArgs;
use crate::output::{print_json, symbols};

pub fn cmd_plan(script: &ScriptArgs, targets: &[String], json: bool) -> Result<()> {
  let project = script.load()?;
  let plans = execute::plan_requests(&project.requests).context("Planning failed")?;
  let plans = execute::select_targets(plans, targets)?;

  if json {
    return print_json(&plans);
  }

  for planned in &plans {
    println!(
      "{} {} {} {}",
      planned.artifact.display(),
      symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.dimmed()),
      planned.source.display(),
      format!("({}, {})", planned.kind, planned.tool).if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
    println!("  {}", planned.command_line());
  }
  println!("Builds: {}", plans.len());

  Ok(())
}
