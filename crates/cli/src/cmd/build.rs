//! Implementation of the `construct build` command.
//!
//! Evaluates the build script, plans every request, then runs the selected
//! builds in parallel. Planning errors stop the command before any tool runs,
//! and the first failed build cancels the rest.

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use construct_lib::execute::{self, ExecuteConfig, RunResult};

use crate::cmd::ScriptArgs;
use crate::output::{Status, format_duration, print_status, summary};

/// Execute the build command.
///
/// Prints each command before running it, then one status line per build
/// and a summary. Returns an error if any build failed or was cancelled.
pub fn cmd_build(
  script: &ScriptArgs,
  targets: &[String],
  jobs: Option<usize>,
  dry_run: bool,
  verbose: bool,
) -> Result<()> {
  let project = script.load()?;
  let plans = execute::plan_requests(&project.requests).context("Planning failed")?;
  let plans = execute::select_targets(plans, targets)?;

  if plans.is_empty() {
    print_status(Status::Note, "Nothing to build.");
    return Ok(());
  }

  for planned in &plans {
    println!("{}", planned.command_line());
  }

  if dry_run {
    return Ok(());
  }

  let mut config = ExecuteConfig::default();
  if let Some(jobs) = jobs {
    config.parallelism = jobs.max(1);
  }

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let result = rt.block_on(async {
    tokio::select! {
      result = execute::execute(plans, &project.root, &config) => Some(result),
      _ = tokio::signal::ctrl_c() => None,
    }
  });
  // Shutting the runtime down drops in-flight builds, which kills their
  // processes and removes partial artifacts
  drop(rt);

  let Some(result) = result else {
    warn!("interrupted");
    bail!("Interrupted");
  };

  print_report(&result, verbose);

  if !result.is_success() {
    bail!(
      "{} of {} build(s) did not complete",
      result.failed.len() + result.cancelled.len(),
      result.total()
    );
  }

  info!(count = result.succeeded.len(), "build finished");
  Ok(())
}

fn print_report(result: &RunResult, verbose: bool) {
  for built in &result.succeeded {
    if verbose {
      let line = format!("{} ({})", built.planned.artifact.display(), format_duration(built.elapsed));
      print_status(Status::Ok, &line);
    }
    if !built.stderr.is_empty() {
      eprint!("{}", built.stderr);
    }
  }

  for failure in &result.failed {
    print_status(
      Status::Failed,
      &format!("{}: {}", failure.planned.artifact.display(), failure.error),
    );
    if let Some(diagnostics) = failure.error.diagnostics() {
      eprint!("{diagnostics}");
    }
  }

  for cancelled in &result.cancelled {
    print_status(Status::Warning, &format!("{}: cancelled", cancelled.artifact.display()));
  }

  let status = if result.is_success() { Status::Ok } else { Status::Failed };
  print_status(
    status,
    &summary(
      result.succeeded.len(),
      result.failed.len(),
      result.cancelled.len(),
      result.elapsed,
    ),
  );
}
