//! Single build realization.
//!
//! Runs a planned build's command in the build root and puts the artifact in
//! place. An artifact only ever appears complete: captured output is staged
//! in a temporary file next to the artifact and renamed over it once the
//! command has succeeded, and anything left at the artifact path by a failed
//! or cancelled build is removed.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tempfile::NamedTempFile;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::action::{ExecError, run_command};
use crate::build::{BuildError, BuildResult, BuildState, OutputMode, PlannedBuild};

/// Removes a partially written artifact unless disarmed.
///
/// Dropping the guard (an error return, or the build future being dropped on
/// cancellation) deletes whatever the tool left at the path.
struct PartialArtifact {
  path: PathBuf,
  armed: bool,
}

impl PartialArtifact {
  fn new(path: PathBuf) -> Self {
    Self { path, armed: true }
  }

  fn disarm(mut self) {
    self.armed = false;
  }
}

impl Drop for PartialArtifact {
  fn drop(&mut self) {
    if self.armed && std::fs::remove_file(&self.path).is_ok() {
      debug!(path = ?self.path, "removed partial artifact");
    }
  }
}

/// Realize a planned build in `root`.
///
/// # Errors
///
/// - [`BuildError::SourceNotFound`] if the source does not exist
/// - [`BuildError::Spawn`] if the tool cannot be started
/// - [`BuildError::ExecutionFailure`] on a non-zero exit
/// - [`BuildError::MissingArtifact`] if the tool exits zero without writing
///   the artifact
pub async fn realize(planned: PlannedBuild, root: &Path) -> Result<BuildResult, BuildError> {
  let start = Instant::now();
  info!(
    source = %planned.source.display(),
    artifact = %planned.artifact.display(),
    "building"
  );

  let result = run_build(&planned, root).await;
  match result {
    Ok(stderr) => {
      info!(
        artifact = %planned.artifact.display(),
        state = %BuildState::Succeeded,
        "build complete"
      );
      Ok(BuildResult {
        planned,
        stderr,
        elapsed: start.elapsed(),
      })
    }
    Err(e) => {
      warn!(
        artifact = %planned.artifact.display(),
        state = %BuildState::Failed,
        error = %e,
        "build failed"
      );
      Err(e)
    }
  }
}

async fn run_build(planned: &PlannedBuild, root: &Path) -> Result<String, BuildError> {
  let source = root.join(&planned.source);
  if !fs::try_exists(&source).await.unwrap_or(false) {
    return Err(BuildError::SourceNotFound {
      path: planned.source.clone(),
      needed_by: planned.artifact.clone(),
    });
  }

  let artifact = root.join(&planned.artifact);
  let parent = artifact.parent().unwrap_or(root).to_path_buf();
  fs::create_dir_all(&parent).await.map_err(|source| BuildError::Io {
    path: parent.clone(),
    source,
  })?;
  remove_stale(&artifact).await?;

  let guard = PartialArtifact::new(artifact.clone());

  let output = run_command(&planned.command, &planned.exec_env, root)
    .await
    .map_err(|e| match e {
      ExecError::Spawn { program, source } => BuildError::Spawn { program, source },
      ExecError::EmptyCommand => BuildError::Composition {
        path: planned.source.clone(),
        source: crate::subst::CompositionError::EmptyCommand {
          template: planned.tool.clone(),
        },
      },
    })?;
  debug!(
    artifact = %planned.artifact.display(),
    code = ?output.code,
    state = %BuildState::Executed,
    "command executed"
  );

  if !output.success() {
    return Err(BuildError::ExecutionFailure {
      command: planned.command_line(),
      code: output.code,
      stderr: output.stderr_lossy(),
    });
  }

  match planned.output {
    OutputMode::Stdout => write_captured(&parent, &artifact, &output.stdout).await?,
    OutputMode::Tool => {
      if !fs::try_exists(&artifact).await.unwrap_or(false) {
        return Err(BuildError::MissingArtifact {
          path: planned.artifact.clone(),
        });
      }
    }
  }

  guard.disarm();
  Ok(output.stderr_lossy())
}

async fn remove_stale(artifact: &Path) -> Result<(), BuildError> {
  match fs::remove_file(artifact).await {
    Ok(()) => {
      debug!(path = ?artifact, "removed stale artifact");
      Ok(())
    }
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
    Err(source) => Err(BuildError::Io {
      path: artifact.to_path_buf(),
      source,
    }),
  }
}

/// Write captured output to the artifact path atomically.
///
/// The staged file is deleted when the returned future is dropped before the
/// rename.
async fn write_captured(dir: &Path, artifact: &Path, bytes: &[u8]) -> Result<(), BuildError> {
  let io_err = |source| BuildError::Io {
    path: artifact.to_path_buf(),
    source,
  };

  let staged = NamedTempFile::new_in(dir).map_err(io_err)?.into_temp_path();
  fs::write(&staged, bytes).await.map_err(io_err)?;
  fs::rename(&staged, artifact).await.map_err(io_err)?;
  Ok(())
}
