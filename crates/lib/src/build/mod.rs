//! Builders: turning one source into one artifact.
//!
//! A build request moves through a fixed set of states:
//!
//! ```text
//! Received -> SuffixResolved -> CommandComposed -> Executed -> {Succeeded, Failed}
//! ```
//!
//! [`plan`] covers the first three: it looks the source suffix up in the
//! environment's registry, derives the artifact path, and composes the
//! command. Planning touches neither the filesystem nor any process, so a
//! whole run can be planned before anything executes. [`execute::realize`]
//! covers the rest.
//!
//! # Special Variables
//!
//! While composing a build's command the following names resolve to the
//! build's own paths (relative to the build root) and are never expanded
//! further:
//!
//! - `$TARGET`, `$TARGETS` - the artifact
//! - `$SOURCE`, `$SOURCES` - the source
//!
//! A command that references `$TARGET` is expected to write the artifact
//! itself. Otherwise the artifact is the command's standard output.
//!
//! # Submodules
//!
//! - [`execute`] - Running a planned build
//! - [`naming`] - Artifact naming conventions

pub mod execute;
pub mod naming;
mod types;

pub use types::*;

use std::cell::Cell;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::env::Environment;
use crate::subst::{self, CompositionError, Resolved, Resolver};

/// Resolver for a single build: the environment plus the build's paths.
struct BuildResolver<'a> {
  env: &'a Environment,
  target: String,
  source: String,
  target_used: Cell<bool>,
}

impl<'a> BuildResolver<'a> {
  fn new(env: &'a Environment, target: &Path, source: &Path) -> Self {
    Self {
      env,
      target: target.to_string_lossy().into_owned(),
      source: source.to_string_lossy().into_owned(),
      target_used: Cell::new(false),
    }
  }
}

impl Resolver for BuildResolver<'_> {
  fn resolve(&self, name: &str) -> Result<Option<Resolved<'_>>, CompositionError> {
    match name {
      "TARGET" | "TARGETS" => {
        self.target_used.set(true);
        Ok(Some(Resolved::Tokens(vec![self.target.clone()])))
      }
      "SOURCE" | "SOURCES" => Ok(Some(Resolved::Tokens(vec![self.source.clone()]))),
      _ => self.env.resolve(name),
    }
  }
}

/// The artifact path a request will produce, relative to the build root.
///
/// Without an explicit target this is the source stem wrapped in the
/// kind's prefix and suffix variables.
pub fn artifact_path(request: &BuildRequest) -> Result<PathBuf, CompositionError> {
  let env = &request.env;
  let prefix = subst::compose_var(request.kind.prefix_var(), env)?.join(" ");
  let suffix = subst::compose_var(request.kind.suffix_var(), env)?.join(" ");

  Ok(match &request.target {
    Some(target) => naming::target_name(&prefix, &suffix, target),
    None => naming::artifact_name(&prefix, &suffix, &request.source),
  })
}

/// Resolve the suffix and compose the command for a request.
///
/// # Errors
///
/// - [`BuildError::UnknownSuffix`] if no builder handles the source suffix
/// - [`BuildError::Composition`] if the command cannot be composed
pub fn plan(request: &BuildRequest) -> Result<PlannedBuild, BuildError> {
  plan_request(request).inspect_err(|e| {
    warn!(
      source = %request.source.display(),
      state = %BuildState::Failed,
      error = %e,
      "build planning failed"
    );
  })
}

fn plan_request(request: &BuildRequest) -> Result<PlannedBuild, BuildError> {
  debug!(
    source = %request.source.display(),
    kind = %request.kind,
    state = %BuildState::Received,
    "build request"
  );

  let entry = request.env.registry().resolve(request.kind, &request.source)?;
  debug!(
    source = %request.source.display(),
    tool = %entry.action.tool,
    command = %entry.action.command,
    state = %BuildState::SuffixResolved,
    "suffix resolved"
  );

  let composition = |source| BuildError::Composition {
    path: request.source.clone(),
    source,
  };

  let artifact = artifact_path(request).map_err(composition)?;
  let resolver = BuildResolver::new(&request.env, &artifact, &request.source);
  let command =
    subst::compose_command(&entry.action.command, &entry.action.required, &resolver).map_err(composition)?;
  let output = if resolver.target_used.get() {
    OutputMode::Tool
  } else {
    OutputMode::Stdout
  };

  debug!(
    source = %request.source.display(),
    artifact = %artifact.display(),
    cmd = %command.join(" "),
    output = ?output,
    state = %BuildState::CommandComposed,
    "command composed"
  );

  Ok(PlannedBuild {
    kind: request.kind,
    source: request.source.clone(),
    artifact,
    tool: entry.action.tool.clone(),
    command,
    output,
    exec_env: request.env.exec_env().clone(),
  })
}

/// Plan and run a single request in `root`.
pub async fn build(request: &BuildRequest, root: &Path) -> Result<BuildResult, BuildError> {
  let planned = plan(request)?;
  execute::realize(planned, root).await
}

/// Expand a template the way a build would, with `$TARGET` and `$SOURCE`
/// bound to the request's paths.
pub fn subst_for(request: &BuildRequest, template: &str) -> Result<String, CompositionError> {
  let artifact = artifact_path(request)?;
  let resolver = BuildResolver::new(&request.env, &artifact, &request.source);
  subst::subst(template, &resolver)
}
