//! Implementation of the `construct init` command.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use construct_lib::init::{InitOptions, init};

use crate::output::symbols;

/// Execute the init command.
///
/// Creates `construct.lua`, `.luarc.json` and LuaLS type definitions in the
/// given directory.
///
/// # Errors
///
/// Returns an error if files already exist or if there are permission issues.
pub fn cmd_init(path: &Path) -> Result<()> {
  let options = InitOptions {
    project_path: path.to_path_buf(),
  };

  let result = init(&options).context("Failed to initialize project")?;

  println!(
    "{} {}",
    symbols::SUCCESS.green(),
    "Initialized construct project!".green().bold()
  );
  println!();
  println!(
    "  {} Project directory: {}",
    symbols::INFO.cyan(),
    result.project_dir.display()
  );
  println!("  {} Build script:      {}", symbols::INFO.cyan(), result.script.display());
  println!(
    "  {} LuaLS config:      {}",
    symbols::INFO.cyan(),
    result.luarc_json.display()
  );
  println!(
    "  {} Type definitions:  {}",
    symbols::INFO.cyan(),
    result.types_dir.display()
  );
  println!();
  println!("{}", "Next steps:".bold());
  println!(
    "  1. Edit {} to declare your sources",
    result.script.display().to_string().cyan()
  );
  println!(
    "  2. Run: {}",
    format!("construct build -C {}", result.project_dir.display()).cyan()
  );

  Ok(())
}
