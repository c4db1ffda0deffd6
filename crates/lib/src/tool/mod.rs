//! Tools: named configuration units that seed an environment.
//!
//! A tool sets construction variables (compiler names, flags, command
//! templates) and registers the source suffixes it knows how to build.
//!
//! # Submodules
//!
//! - [`fortran`] - Fortran-family compilers (FORTRAN, F77, F90, F95, F03, F08)

pub mod fortran;

use thiserror::Error;

use crate::env::Environment;

/// Tools applied when a script does not name any.
pub const DEFAULT_TOOLS: &[&str] = &["fortran"];

#[derive(Debug, Error)]
pub enum ToolError {
  #[error("unknown tool '{0}'")]
  Unknown(String),
}

/// A configuration unit applied to an environment.
pub trait Tool {
  /// Name used to select the tool (e.g. in `tools = { "fortran" }`).
  fn name(&self) -> &'static str;

  /// Seed variables and register suffixes.
  fn generate(&self, env: &mut Environment);
}

/// Look up a tool by name.
pub fn by_name(name: &str) -> Result<Box<dyn Tool>, ToolError> {
  match name {
    "fortran" => Ok(Box::new(fortran::Fortran)),
    other => Err(ToolError::Unknown(other.to_string())),
  }
}

/// The default tool set, in application order.
pub fn default_tools() -> Vec<Box<dyn Tool>> {
  DEFAULT_TOOLS.iter().filter_map(|name| by_name(name).ok()).collect()
}
