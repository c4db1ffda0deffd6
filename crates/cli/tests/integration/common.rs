//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Sources built by the `shfortranflags.lua` fixture.
pub const FLAGS_SOURCES: [&str; 8] = [
  "test01.f",
  "test02.F",
  "test03.for",
  "test04.FOR",
  "test05.ftn",
  "test06.FTN",
  "test07.fpp",
  "test08.FPP",
];

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Content of a Fortran source the flags tool understands.
pub fn fortran_source(name: &str) -> String {
  let suffix = name.rsplit_once('.').map(|(_, s)| s).unwrap_or("");
  format!("This is a .{suffix} file.\n#fortran\n")
}

/// Isolated build root.
///
/// Each test gets its own temporary directory holding the build script, the
/// flags tool and the sources.
pub struct TestEnv {
  pub temp: TempDir,
  pub script_path: PathBuf,
}

impl TestEnv {
  /// Create from a fixture script.
  ///
  /// Copies the fixture content to `construct.lua` next to the flags tool.
  pub fn from_fixture(name: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let script_path = temp.path().join("construct.lua");
    std::fs::write(&script_path, fixture_content(name)).unwrap();
    std::fs::write(
      temp.path().join("myfortran_flags.sh"),
      fixture_content("myfortran_flags.sh"),
    )
    .unwrap();
    Self { temp, script_path }
  }

  /// Write a file relative to the build root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Write Fortran sources with the marker line.
  pub fn write_sources(&self, names: &[&str]) {
    for name in names {
      self.write_file(name, &fortran_source(name));
    }
  }

  pub fn read_file(&self, relative_path: &str) -> String {
    std::fs::read_to_string(self.temp.path().join(relative_path)).unwrap()
  }

  pub fn exists(&self, relative_path: &str) -> bool {
    self.temp.path().join(relative_path).exists()
  }

  /// Get a Command for the construct binary running in the build root.
  pub fn construct_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("construct");
    cmd.current_dir(self.temp.path());
    cmd.env_remove("RUST_LOG");
    cmd
  }
}
