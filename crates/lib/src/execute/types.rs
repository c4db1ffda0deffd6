//! Types for running many builds.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::build::{BuildError, BuildResult, PlannedBuild};

/// Errors that stop a run before any build executes.
#[derive(Debug, Error)]
pub enum ExecuteError {
  /// A request could not be planned.
  #[error(transparent)]
  Plan(#[from] BuildError),

  /// Two requests derive the same artifact path.
  #[error("'{}' would be built from both '{}' and '{}'", .artifact.display(), .first.display(), .second.display())]
  DuplicateTarget {
    artifact: PathBuf,
    first: PathBuf,
    second: PathBuf,
  },

  /// A selected target matches no request.
  #[error("don't know how to make target '{0}'")]
  UnknownTarget(String),
}

/// A build that ran and failed.
#[derive(Debug)]
pub struct BuildFailure {
  pub planned: PlannedBuild,
  pub error: BuildError,
}

/// Outcome of a run.
#[derive(Debug, Default)]
pub struct RunResult {
  /// Successful builds, in plan order.
  pub succeeded: Vec<BuildResult>,

  /// Failed builds, in plan order.
  pub failed: Vec<BuildFailure>,

  /// Builds that never finished because the run was cancelled.
  pub cancelled: Vec<PlannedBuild>,

  pub elapsed: Duration,
}

impl RunResult {
  /// Returns true if every planned build succeeded.
  pub fn is_success(&self) -> bool {
    self.failed.is_empty() && self.cancelled.is_empty()
  }

  pub fn total(&self) -> usize {
    self.succeeded.len() + self.failed.len() + self.cancelled.len()
  }
}

/// Configuration for a run.
#[derive(Debug, Clone)]
pub struct ExecuteConfig {
  /// Maximum number of builds to execute in parallel.
  pub parallelism: usize,

  /// Cancel outstanding builds after the first failure.
  pub fail_fast: bool,
}

impl Default for ExecuteConfig {
  fn default() -> Self {
    Self {
      parallelism: num_cpus(),
      fail_fast: true,
    }
  }
}

/// Get the number of CPUs for default parallelism.
fn num_cpus() -> usize {
  std::thread::available_parallelism().map(|p| p.get()).unwrap_or(4)
}
