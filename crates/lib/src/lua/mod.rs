//! Lua runtime for build scripts.
//!
//! Build scripts configure environments and declare builds through the
//! `construct` global table. Evaluating a script only records build
//! requests; nothing executes until the script has finished.
//!
//! # Submodules
//!
//! - [`env`] - The environment object (`env:append{}`, `env:shared_object{}`, ...)
//! - [`globals`] - The `construct` global table
//! - [`runtime`] - Lua VM creation and file loading

pub mod env;
pub mod globals;
pub mod runtime;

use std::cell::RefCell;
use std::rc::Rc;

use crate::build::BuildRequest;

/// Build requests recorded while a script runs.
pub type Requests = Rc<RefCell<Vec<BuildRequest>>>;
