//! Test utilities for construct-lib.
//!
//! Fixtures standing in for a real Fortran compiler. The flags tool echoes
//! the options it was given on the first line, then copies its source file
//! minus lines starting with `#<marker>`.

use std::path::{Path, PathBuf};

/// POSIX shell flags tool, shared with the CLI end-to-end fixtures.
///
/// Usage: `sh myfortran_flags.sh <marker> [options...] <source>`
pub const FLAGS_TOOL: &str = include_str!(concat!(
  env!("CARGO_MANIFEST_DIR"),
  "/../cli/tests/fixtures/myfortran_flags.sh"
));

pub const FLAGS_TOOL_NAME: &str = "myfortran_flags.sh";

/// Write the flags tool into `dir` and return its path.
pub fn write_flags_tool(dir: &Path) -> PathBuf {
  let path = dir.join(FLAGS_TOOL_NAME);
  std::fs::write(&path, FLAGS_TOOL).unwrap();
  path
}

/// Write a Fortran source with a marker line the flags tool strips.
pub fn write_fortran_source(dir: &Path, name: &str) -> PathBuf {
  let path = dir.join(name);
  let (_, suffix) = name.rsplit_once('.').unwrap_or((name, ""));
  std::fs::write(&path, format!("This is a .{suffix} file.\n#fortran\n")).unwrap();
  path
}

#[cfg(test)]
mod tests {
  use std::process::Command;

  use tempfile::TempDir;

  use super::*;

  #[test]
  fn flags_tool_is_a_shell_script() {
    assert!(FLAGS_TOOL.starts_with("#!/bin/sh\n"));
    assert!(FLAGS_TOOL.contains(r##"comment="#$1""##));
  }

  #[cfg(unix)]
  #[test]
  fn flags_tool_echoes_options_and_strips_marker() {
    let temp = TempDir::new().unwrap();
    write_flags_tool(temp.path());
    write_fortran_source(temp.path(), "test01.f");

    let output = Command::new("/bin/sh")
      .args([FLAGS_TOOL_NAME, "fortran", "-c", "-x", "test01.f"])
      .current_dir(temp.path())
      .output()
      .unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), " -c -x\nThis is a .f file.\n");
  }
}
