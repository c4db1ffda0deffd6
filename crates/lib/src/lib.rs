//! construct-lib: construction environments and builder dispatch
//!
//! This crate turns build scripts into compiled objects:
//! - `Environment`: variables, tools and a suffix registry, copied on write
//! - `subst`: `$VAR` expansion into argument vectors
//! - `build`: plan and realize a single object from a source file
//! - `execute`: run many builds in parallel with fail-fast cancellation
//! - `eval`: evaluate a `construct.lua` script into build requests

pub mod action;
pub mod build;
pub mod consts;
pub mod env;
pub mod eval;
pub mod execute;
pub mod init;
pub mod lua;
pub mod platform;
pub mod registry;
pub mod subst;
pub mod tool;
pub mod util;
pub mod vars;
