//! `construct build` integration tests.

use predicates::prelude::*;

use super::common::{FLAGS_SOURCES, TestEnv};

#[test]
fn builds_every_fortran_suffix_with_flags() {
  if cfg!(windows) {
    return;
  }

  let env = TestEnv::from_fixture("shfortranflags.lua");
  env.write_sources(&FLAGS_SOURCES);

  env
    .construct_cmd()
    .arg("build")
    .assert()
    .success()
    .stdout(predicate::str::contains(
      "/bin/sh myfortran_flags.sh fortran -c -x test01.f",
    ))
    .stderr(predicate::str::contains("Built 8, failed 0"));

  for (i, source) in FLAGS_SOURCES.iter().enumerate() {
    let suffix = source.rsplit_once('.').unwrap().1;
    assert_eq!(
      env.read_file(&format!("test{:02}.os", i + 1)),
      format!(" -c -x\nThis is a .{suffix} file.\n"),
      "{source}"
    );
  }
}

#[test]
fn unknown_suffix_fails_without_building() {
  if cfg!(windows) {
    return;
  }

  let env = TestEnv::from_fixture("unknown_suffix.lua");
  env.write_sources(&["test01.f"]);
  env.write_file("test09.xyz", "?\n");

  env
    .construct_cmd()
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("test09.xyz"));

  assert!(!env.exists("test01.os"));
  assert!(!env.exists("test09.os"));
}

#[test]
fn dry_run_prints_commands_only() {
  let env = TestEnv::from_fixture("shfortranflags.lua");
  env.write_sources(&FLAGS_SOURCES);

  env
    .construct_cmd()
    .args(["build", "--dry-run"])
    .assert()
    .success()
    .stdout(predicate::str::contains("-c -x test08.FPP"));

  assert!(!env.exists("test01.os"));
}

#[test]
fn selected_targets_only() {
  if cfg!(windows) {
    return;
  }

  let env = TestEnv::from_fixture("shfortranflags.lua");
  env.write_sources(&FLAGS_SOURCES);

  env
    .construct_cmd()
    .args(["build", "test02.os", "test05.ftn"])
    .assert()
    .success()
    .stderr(predicate::str::contains("Built 2"));

  assert!(env.exists("test02.os"));
  assert!(env.exists("test05.os"));
  assert!(!env.exists("test01.os"));
}

#[test]
fn dot_prefixed_target_selects_the_build() {
  if cfg!(windows) {
    return;
  }

  let env = TestEnv::from_fixture("shfortranflags.lua");
  env.write_sources(&FLAGS_SOURCES);

  env
    .construct_cmd()
    .args(["build", "./test01.os"])
    .assert()
    .success()
    .stderr(predicate::str::contains("Built 1"));

  assert!(env.exists("test01.os"));
  assert!(!env.exists("test02.os"));
}

#[test]
fn unknown_target_is_error() {
  let env = TestEnv::from_fixture("shfortranflags.lua");

  env
    .construct_cmd()
    .args(["build", "nope.os"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("don't know how to make target 'nope.os'"));
}

#[test]
fn missing_source_fails_the_run() {
  if cfg!(windows) {
    return;
  }

  let env = TestEnv::from_fixture("missing_source.lua");
  env.write_sources(&["good.f"]);

  env
    .construct_cmd()
    .args(["build", "-j", "1"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("source 'missing.f' not found"))
    .stderr(predicate::str::contains("failed 1"));

  assert!(!env.exists("missing.os"));
}

#[test]
fn directory_and_file_options() {
  if cfg!(windows) {
    return;
  }

  let env = TestEnv::from_fixture("shfortranflags.lua");
  env.write_sources(&FLAGS_SOURCES);
  std::fs::rename(&env.script_path, env.temp.path().join("alt.lua")).unwrap();

  let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("construct");
  cmd
    .arg("build")
    .arg("-C")
    .arg(env.temp.path())
    .args(["-f", "alt.lua", "test01.os"])
    .assert()
    .success();

  assert_eq!(env.read_file("test01.os"), " -c -x\nThis is a .f file.\n");
}

#[test]
fn missing_script_is_error() {
  let temp = tempfile::TempDir::new().unwrap();

  assert_cmd::cargo::cargo_bin_cmd!("construct")
    .current_dir(temp.path())
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("no build script found"));
}
