//! Initialize a new construct project directory.
//!
//! This module provides the core logic for the `construct init` command, which
//! scaffolds a project directory with:
//! - `construct.lua` build script with examples
//! - `.luarc.json` for LuaLS IDE integration
//! - `.construct/types/globals.d.lua` type definitions

mod templates;

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use crate::consts::DEFAULT_SCRIPT;

pub use templates::{GLOBALS_D_LUA, LUARC_JSON_TEMPLATE, SCRIPT_TEMPLATE};

/// Directory under the project root holding LuaLS type definitions.
const TYPES_DIR: &str = ".construct/types";

/// Errors that can occur during initialization.
#[derive(Debug, Error)]
pub enum InitError {
  #[error("file already exists: {}", path.display())]
  PathExists { path: PathBuf },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: std::io::Error },

  #[error("failed to canonicalize path {}: {source}", path.display())]
  Canonicalize { path: PathBuf, source: std::io::Error },
}

/// Options for initializing a project directory.
pub struct InitOptions {
  /// Path to the project directory to create
  pub project_path: PathBuf,
}

/// Result of a successful initialization.
#[derive(Debug)]
pub struct InitResult {
  /// The project directory (canonicalized)
  pub project_dir: PathBuf,
  /// Path to created construct.lua
  pub script: PathBuf,
  /// Path to created .luarc.json
  pub luarc_json: PathBuf,
  /// Path to types directory
  pub types_dir: PathBuf,
}

/// Initialize a new project directory.
///
/// Nothing is written if any generated file already exists.
///
/// # Errors
///
/// Returns an error if:
/// - `construct.lua`, `.luarc.json` or the type definitions already exist
/// - Directory creation fails
/// - File writing fails
pub fn init(options: &InitOptions) -> Result<InitResult, InitError> {
  let requested = &options.project_path;
  fs::create_dir_all(requested).map_err(|source| InitError::CreateDir {
    path: requested.clone(),
    source,
  })?;
  let project_dir = dunce::canonicalize(requested).map_err(|source| InitError::Canonicalize {
    path: requested.clone(),
    source,
  })?;

  let result = InitResult {
    script: project_dir.join(DEFAULT_SCRIPT),
    luarc_json: project_dir.join(".luarc.json"),
    types_dir: project_dir.join(TYPES_DIR),
    project_dir,
  };

  // LuaLS resolves library entries relative to the workspace
  let luarc = LUARC_JSON_TEMPLATE.replace("{types_path}", TYPES_DIR);
  let files = [
    (result.script.clone(), SCRIPT_TEMPLATE),
    (result.luarc_json.clone(), luarc.as_str()),
    (result.types_dir.join("globals.d.lua"), GLOBALS_D_LUA),
  ];

  if let Some((path, _)) = files.iter().find(|(path, _)| path.exists()) {
    return Err(InitError::PathExists { path: path.clone() });
  }

  fs::create_dir_all(&result.types_dir).map_err(|source| InitError::CreateDir {
    path: result.types_dir.clone(),
    source,
  })?;
  for (path, content) in &files {
    fs::write(path, content).map_err(|source| InitError::WriteFile {
      path: path.clone(),
      source,
    })?;
    debug!(path = %path.display(), "wrote project file");
  }

  info!(dir = %result.project_dir.display(), "initialized project");
  Ok(result)
}
