//! Running many builds.
//!
//! A run has two phases:
//! 1. Planning: every request is resolved and composed. Any error here stops
//!    the run before a single tool executes.
//! 2. Execution: planned builds run in parallel, bounded by
//!    [`ExecuteConfig::parallelism`]. With fail-fast enabled the first failure
//!    cancels everything still running or queued.
//!
//! Builds are independent of each other: each carries its own environment
//! snapshot and writes only its own artifact.

pub mod types;

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::build::{self, BuildRequest, PlannedBuild, naming};

pub use types::{BuildFailure, ExecuteConfig, ExecuteError, RunResult};

/// Plan every request.
///
/// # Errors
///
/// Returns the first planning error, or [`ExecuteError::DuplicateTarget`] if
/// two requests derive the same artifact path.
pub fn plan_requests(requests: &[BuildRequest]) -> Result<Vec<PlannedBuild>, ExecuteError> {
  let mut seen: HashMap<PathBuf, PathBuf> = HashMap::new();
  let mut plans = Vec::with_capacity(requests.len());

  for request in requests {
    let planned = build::plan(request)?;
    if let Some(first) = seen.insert(naming::normalize(&planned.artifact), planned.source.clone()) {
      return Err(ExecuteError::DuplicateTarget {
        artifact: planned.artifact,
        first,
        second: planned.source,
      });
    }
    plans.push(planned);
  }

  debug!(count = plans.len(), "planned builds");
  Ok(plans)
}

/// Keep only the builds named by `targets`.
///
/// A target matches a build by artifact path or source path. No targets, or
/// the target `.`, selects everything.
///
/// # Errors
///
/// Returns [`ExecuteError::UnknownTarget`] for a target that matches nothing.
pub fn select_targets(plans: Vec<PlannedBuild>, targets: &[String]) -> Result<Vec<PlannedBuild>, ExecuteError> {
  if targets.is_empty() || targets.iter().any(|t| t == ".") {
    return Ok(plans);
  }

  let is_match = |planned: &PlannedBuild, target: &str| {
    let target = naming::normalize(Path::new(target));
    naming::normalize(&planned.artifact) == target || naming::normalize(&planned.source) == target
  };

  if let Some(unknown) = targets.iter().find(|t| !plans.iter().any(|p| is_match(p, t))) {
    return Err(ExecuteError::UnknownTarget(unknown.clone()));
  }

  Ok(
    plans
      .into_iter()
      .filter(|p| targets.iter().any(|t| is_match(p, t)))
      .collect(),
  )
}

/// Execute planned builds in `root`.
pub async fn execute(plans: Vec<PlannedBuild>, root: &Path, config: &ExecuteConfig) -> RunResult {
  let start = Instant::now();
  info!(build_count = plans.len(), parallelism = config.parallelism, "starting build execution");

  let semaphore = Arc::new(Semaphore::new(config.parallelism.max(1)));
  let mut pending: BTreeMap<usize, PlannedBuild> = plans.iter().cloned().enumerate().collect();
  let mut join_set = JoinSet::new();

  for (idx, planned) in plans.into_iter().enumerate() {
    let semaphore = semaphore.clone();
    let root = root.to_path_buf();

    join_set.spawn(async move {
      // Acquire semaphore permit inside the task
      let _permit = semaphore.acquire_owned().await.ok();
      (idx, build::execute::realize(planned, &root).await)
    });
  }

  let mut succeeded = BTreeMap::new();
  let mut failed = BTreeMap::new();
  let mut cancelling = false;

  while let Some(joined) = join_set.join_next().await {
    match joined {
      Ok((idx, Ok(build_result))) => {
        pending.remove(&idx);
        succeeded.insert(idx, build_result);
      }
      Ok((idx, Err(e))) => {
        if let Some(planned) = pending.remove(&idx) {
          error!(artifact = %planned.artifact.display(), error = %e, "build failed");
          failed.insert(idx, BuildFailure { planned, error: e });
        }
        if config.fail_fast && !cancelling {
          warn!(remaining = pending.len(), "cancelling outstanding builds");
          join_set.abort_all();
          cancelling = true;
        }
      }
      Err(e) if e.is_cancelled() => {}
      Err(e) => {
        // Task panicked; its build stays pending and is reported as cancelled
        error!(error = %e, "build task panicked");
      }
    }
  }

  let result = RunResult {
    succeeded: succeeded.into_values().collect(),
    failed: failed.into_values().collect(),
    cancelled: pending.into_values().collect(),
    elapsed: start.elapsed(),
  };

  info!(
    succeeded = result.succeeded.len(),
    failed = result.failed.len(),
    cancelled = result.cancelled.len(),
    "build execution complete"
  );

  result
}

/// Plan, select and execute in one step.
pub async fn run(
  requests: &[BuildRequest],
  targets: &[String],
  root: &Path,
  config: &ExecuteConfig,
) -> Result<RunResult, ExecuteError> {
  let plans = select_targets(plan_requests(requests)?, targets)?;
  Ok(execute(plans, root, config).await)
}
