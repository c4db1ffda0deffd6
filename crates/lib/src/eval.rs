//! Build script evaluation.
//!
//! Runs a `construct.lua` script and collects the build requests it declares.
//! Evaluation finishes completely before anything is planned or executed, so
//! the returned requests are plain values with no ties to the Lua runtime.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use mlua::prelude::*;
use tracing::{debug, info};

use crate::build::BuildRequest;
use crate::lua::{Requests, runtime};
use crate::platform::Platform;

/// Errors that can occur during script evaluation.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
  /// Lua evaluation error.
  #[error("lua error: {0}")]
  Lua(#[from] LuaError),

  /// The host platform has no default construction variables.
  #[error("unsupported platform")]
  UnsupportedPlatform,

  #[error("cannot resolve build root for {}: {source}", path.display())]
  Root { path: PathBuf, source: std::io::Error },
}

/// The requests declared by one build script.
#[derive(Debug)]
pub struct Project {
  /// Directory containing the script. Sources and artifacts are relative to it.
  pub root: PathBuf,

  /// Build requests in declaration order.
  pub requests: Vec<BuildRequest>,
}

/// Evaluate a build script for the current platform.
///
/// # Errors
///
/// Returns [`EvalError::UnsupportedPlatform`] on hosts without platform
/// defaults, or [`EvalError::Lua`] if the script fails.
pub fn evaluate_script(path: &Path) -> Result<Project, EvalError> {
  let platform = Platform::current().ok_or(EvalError::UnsupportedPlatform)?;
  evaluate_script_for(path, platform)
}

/// Evaluate a build script as if running on `platform`.
pub fn evaluate_script_for(path: &Path, platform: Platform) -> Result<Project, EvalError> {
  let canonical = dunce::canonicalize(path).map_err(|source| EvalError::Root {
    path: path.to_path_buf(),
    source,
  })?;
  let root = canonical.parent().unwrap_or(Path::new(".")).to_path_buf();
  info!(script = %canonical.display(), platform = %platform.triple(), "evaluating build script");

  let requests: Requests = Rc::new(RefCell::new(Vec::new()));

  // lua holds clones of `requests` through the environment userdata; it must
  // be dropped before the list can be taken back
  {
    let lua = runtime::create_runtime(platform, requests.clone())?;
    runtime::load_file(&lua, &canonical)?;
  }

  let requests = match Rc::try_unwrap(requests) {
    Ok(cell) => cell.into_inner(),
    Err(shared) => shared.borrow().clone(),
  };
  debug!(count = requests.len(), "collected build requests");

  Ok(Project { root, requests })
}
