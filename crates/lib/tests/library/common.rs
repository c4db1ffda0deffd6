//! Shared helpers for library integration tests.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use construct_lib::eval::{Project, evaluate_script_for};
use construct_lib::lua::{Requests, runtime};
use construct_lib::platform::{Arch, Os, Platform};
use mlua::prelude::*;
use tempfile::TempDir;

/// Stand-in compiler: echoes its options on the first line, then copies the
/// source minus lines starting with `#<marker>`.
pub const FLAGS_TOOL: &str = include_str!("../../../cli/tests/fixtures/myfortran_flags.sh");

pub fn linux() -> Platform {
  Platform::new(Arch::X86_64, Os::Linux)
}

/// Create a Lua runtime with the `construct` global for a fixed platform.
pub fn create_test_runtime() -> LuaResult<(Lua, Requests)> {
  let requests: Requests = Rc::new(RefCell::new(Vec::new()));
  let lua = runtime::create_runtime(linux(), requests.clone())?;
  Ok((lua, requests))
}

/// A temporary build root.
pub struct Workspace {
  pub temp: TempDir,
}

impl Workspace {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn path(&self) -> &Path {
    self.temp.path()
  }

  pub fn write(&self, relative_path: &str, content: &str) -> PathBuf {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
  }

  pub fn read(&self, relative_path: &str) -> String {
    std::fs::read_to_string(self.temp.path().join(relative_path)).unwrap()
  }

  /// Write the flags tool and one source per name.
  pub fn with_fortran_sources(self, names: &[&str]) -> Self {
    self.write("myfortran_flags.sh", FLAGS_TOOL);
    for name in names {
      let suffix = name.rsplit_once('.').map(|(_, s)| s).unwrap_or("");
      self.write(name, &format!("This is a .{suffix} file.\n#fortran\n"));
    }
    self
  }

  /// Write `construct.lua` and evaluate it.
  pub fn evaluate(&self, script: &str) -> Project {
    let path = self.write("construct.lua", script);
    evaluate_script_for(&path, linux()).unwrap()
  }
}
