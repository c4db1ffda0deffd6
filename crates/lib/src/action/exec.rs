use std::collections::BTreeMap;
use std::path::Path;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

/// Exit status and captured streams of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
  /// Exit code, or `None` if the process was terminated by a signal.
  pub code: Option<i32>,
  pub stdout: Vec<u8>,
  pub stderr: Vec<u8>,
}

impl ExecOutput {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }

  pub fn stderr_lossy(&self) -> String {
    String::from_utf8_lossy(&self.stderr).into_owned()
  }
}

#[derive(Debug, Error)]
pub enum ExecError {
  #[error("cannot run an empty command")]
  EmptyCommand,

  #[error("failed to start '{program}': {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },
}

/// Run an argument vector as a subprocess.
///
/// The program is started directly, without a shell, so tokens are passed
/// through exactly as composed. The child sees only the variables in `env`;
/// when `env` sets `PATH`, that path is also used to find the program.
///
/// Stdin is closed. Stdout and stderr are captured in full. If the returned
/// future is dropped before completion the child is killed.
pub async fn run_command(argv: &[String], env: &BTreeMap<String, String>, cwd: &Path) -> Result<ExecOutput, ExecError> {
  let (program, args) = argv.split_first().ok_or(ExecError::EmptyCommand)?;
  info!(cmd = %argv.join(" "), "executing command");
  debug!(cwd = ?cwd, "spawning process");

  let output = Command::new(program)
    .args(args)
    .current_dir(cwd)
    .env_clear()
    .envs(env)
    .stdin(Stdio::null())
    .kill_on_drop(true)
    .output()
    .await
    .map_err(|source| ExecError::Spawn {
      program: program.clone(),
      source,
    })?;

  let result = ExecOutput {
    code: output.status.code(),
    stdout: output.stdout,
    stderr: output.stderr,
  };

  if !result.stderr.is_empty() {
    debug!(stderr = %result.stderr_lossy(), "command stderr");
  }
  debug!(code = ?result.code, stdout_bytes = result.stdout.len(), "command finished");

  Ok(result)
}
