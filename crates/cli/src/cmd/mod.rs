mod build;
mod info;
mod init;
mod plan;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;

use construct_lib::consts::DEFAULT_SCRIPT;
use construct_lib::eval::{Project, evaluate_script};

pub use build::cmd_build;
pub use info::cmd_info;
pub use init::cmd_init;
pub use plan::cmd_plan;

/// Options locating the build script.
#[derive(Debug, Args)]
pub struct ScriptArgs {
  /// Build script (default: construct.lua)
  #[arg(short, long)]
  file: Option<PathBuf>,

  /// Change to this directory before reading the build script
  #[arg(short = 'C', long)]
  directory: Option<PathBuf>,
}

impl ScriptArgs {
  /// Path of the build script. A relative `--file` is taken from `--directory`.
  pub fn script_path(&self) -> PathBuf {
    let file = self.file.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPT));
    match &self.directory {
      Some(dir) if file.is_relative() => dir.join(file),
      _ => file,
    }
  }

  /// Evaluate the build script.
  pub fn load(&self) -> Result<Project> {
    let path = self.script_path();
    if !path.exists() {
      bail!("no build script found at {}", path.display());
    }
    evaluate_script(&path).with_context(|| format!("Failed to evaluate {}", path.display()))
  }
}
