//! Types for build requests and their outcomes.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::env::Environment;
use crate::registry::UnknownSuffix;
use crate::subst::CompositionError;

/// The kind of artifact a builder produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
  /// Object file for static linking.
  StaticObject,
  /// Position-independent object file for shared libraries.
  SharedObject,
}

impl TargetKind {
  /// Variable holding the artifact name prefix for this kind.
  pub fn prefix_var(&self) -> &'static str {
    match self {
      Self::StaticObject => "OBJPREFIX",
      Self::SharedObject => "SHOBJPREFIX",
    }
  }

  /// Variable holding the artifact name suffix for this kind.
  pub fn suffix_var(&self) -> &'static str {
    match self {
      Self::StaticObject => "OBJSUFFIX",
      Self::SharedObject => "SHOBJSUFFIX",
    }
  }
}

impl fmt::Display for TargetKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::StaticObject => f.write_str("static object"),
      Self::SharedObject => f.write_str("shared object"),
    }
  }
}

/// Progress of a single build request.
///
/// `Received -> SuffixResolved -> CommandComposed -> Executed -> {Succeeded, Failed}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
  Received,
  SuffixResolved,
  CommandComposed,
  Executed,
  Succeeded,
  Failed,
}

impl fmt::Display for BuildState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::Received => "received",
      Self::SuffixResolved => "suffix_resolved",
      Self::CommandComposed => "command_composed",
      Self::Executed => "executed",
      Self::Succeeded => "succeeded",
      Self::Failed => "failed",
    };
    f.write_str(s)
  }
}

/// A request to build one artifact from one source.
///
/// The environment is a snapshot taken when the builder was called; later
/// changes to the environment that made the request do not affect it.
#[derive(Debug, Clone)]
pub struct BuildRequest {
  pub kind: TargetKind,
  pub source: PathBuf,
  /// Explicit target name. Prefix and suffix are added when missing.
  pub target: Option<String>,
  pub env: Environment,
}

impl BuildRequest {
  pub fn new(kind: TargetKind, source: impl Into<PathBuf>, env: Environment) -> Self {
    Self {
      kind,
      source: source.into(),
      target: None,
      env,
    }
  }

  pub fn with_target(mut self, target: impl Into<String>) -> Self {
    self.target = Some(target.into());
    self
  }
}

/// How the artifact comes into existence once the command has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
  /// The command's stdout is written to the artifact path.
  Stdout,
  /// The command writes the artifact itself (its template names `$TARGET`).
  Tool,
}

/// A build request after suffix resolution and command composition.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedBuild {
  pub kind: TargetKind,
  pub source: PathBuf,
  /// Artifact path relative to the build root.
  pub artifact: PathBuf,
  pub tool: String,
  pub command: Vec<String>,
  pub output: OutputMode,
  /// Environment variables for the child process.
  #[serde(skip)]
  pub exec_env: Arc<BTreeMap<String, String>>,
}

impl PlannedBuild {
  /// The command as a single display string.
  pub fn command_line(&self) -> String {
    self.command.join(" ")
  }
}

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuildResult {
  pub planned: PlannedBuild,
  /// Diagnostics the tool wrote to stderr (may be non-empty on success).
  pub stderr: String,
  pub elapsed: Duration,
}

/// Errors that end a build request in the `Failed` state.
#[derive(Debug, Error)]
pub enum BuildError {
  #[error(transparent)]
  UnknownSuffix(#[from] UnknownSuffix),

  #[error("cannot compose command for '{}': {source}", .path.display())]
  Composition { path: PathBuf, source: CompositionError },

  #[error("source '{}' not found, needed by '{}'", .path.display(), .needed_by.display())]
  SourceNotFound { path: PathBuf, needed_by: PathBuf },

  #[error("command failed with exit code {code:?}: {command}")]
  ExecutionFailure {
    command: String,
    code: Option<i32>,
    stderr: String,
  },

  #[error("command succeeded but did not produce '{}'", .path.display())]
  MissingArtifact { path: PathBuf },

  #[error("failed to start '{program}': {source}")]
  Spawn { program: String, source: std::io::Error },

  #[error("io error on '{}': {source}", .path.display())]
  Io { path: PathBuf, source: std::io::Error },
}

impl BuildError {
  /// Diagnostic output captured from the tool, if any.
  pub fn diagnostics(&self) -> Option<&str> {
    match self {
      Self::ExecutionFailure { stderr, .. } if !stderr.is_empty() => Some(stderr),
      _ => None,
    }
  }
}
