//! `construct plan` integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn plan_lists_commands() {
  let env = TestEnv::from_fixture("shfortranflags.lua");

  env
    .construct_cmd()
    .arg("plan")
    .assert()
    .success()
    .stdout(predicate::str::contains("test03.os"))
    .stdout(predicate::str::contains("/bin/sh myfortran_flags.sh fortran -c -x test03.for"))
    .stdout(predicate::str::contains("Builds: 8"));

  assert!(!env.exists("test03.os"));
}

#[test]
fn plan_json_is_parseable() {
  let env = TestEnv::from_fixture("shfortranflags.lua");

  let output = env.construct_cmd().args(["plan", "--json"]).output().unwrap();
  assert!(output.status.success());

  let plans: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let plans = plans.as_array().unwrap();
  assert_eq!(plans.len(), 8);
  assert_eq!(plans[0]["source"], "test01.f");
  assert_eq!(plans[0]["kind"], "shared_object");
  assert_eq!(plans[0]["output"], "stdout");
  assert_eq!(
    plans[0]["command"],
    serde_json::json!(["/bin/sh", "myfortran_flags.sh", "fortran", "-c", "-x", "test01.f"])
  );
}

#[test]
fn plan_reports_unknown_suffix() {
  let env = TestEnv::from_fixture("unknown_suffix.lua");

  env
    .construct_cmd()
    .arg("plan")
    .assert()
    .failure()
    .stderr(predicate::str::contains("no builder for suffix"));
}
