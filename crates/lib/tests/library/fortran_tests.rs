//! End-to-end builds of Fortran sources through the flags tool.

use std::path::{Path, PathBuf};

use construct_lib::build::{self, BuildError, OutputMode, TargetKind, naming};
use construct_lib::execute::{self, ExecuteConfig, ExecuteError};
use construct_lib::platform::Platform;

use super::common::{Workspace, linux};

const SUFFIXES: [&str; 8] = ["f", "F", "for", "FOR", "ftn", "FTN", "fpp", "FPP"];

const FLAGS_SCRIPT: &str = r#"
  local env = construct.environment {
    SHFORTRAN = '/bin/sh myfortran_flags.sh fortran',
  }
  env:append { SHFORTRANFLAGS = { '-x' } }
  for _, source in ipairs(SOURCES) do
    env:shared_object { target = source:match('^(.*)%.'), source = source }
  end
"#;

fn sources() -> Vec<String> {
  SUFFIXES
    .iter()
    .enumerate()
    .map(|(i, suffix)| format!("test{:02}.{suffix}", i + 1))
    .collect()
}

fn script_for(sources: &[String]) -> String {
  let list: Vec<_> = sources.iter().map(|s| format!("'{s}'")).collect();
  format!("SOURCES = {{ {} }}\n{FLAGS_SCRIPT}", list.join(", "))
}

#[cfg(unix)]
#[tokio::test]
async fn shared_objects_from_every_suffix() {
  let sources = sources();
  let names: Vec<&str> = sources.iter().map(String::as_str).collect();
  let ws = Workspace::new().with_fortran_sources(&names);
  let project = ws.evaluate(&script_for(&sources));

  let result = execute::run(&project.requests, &[], &project.root, &ExecuteConfig::default())
    .await
    .unwrap();

  assert!(result.is_success(), "{:?}", result.failed);
  assert_eq!(result.succeeded.len(), 8);
  for (source, suffix) in sources.iter().zip(SUFFIXES) {
    let stem = source.rsplit_once('.').unwrap().0;
    assert_eq!(
      ws.read(&format!("{stem}.os")),
      format!(" -c -x\nThis is a .{suffix} file.\n"),
      "{source}"
    );
  }
}

#[test]
fn every_suffix_composes_the_same_command() {
  let sources = sources();
  let ws = Workspace::new();
  let project = ws.evaluate(&script_for(&sources));

  let plans = execute::plan_requests(&project.requests).unwrap();

  for (planned, source) in plans.iter().zip(&sources) {
    assert_eq!(
      planned.command,
      ["/bin/sh", "myfortran_flags.sh", "fortran", "-c", "-x", source.as_str()]
    );
    assert_eq!(planned.tool, "fortran");
  }
}

#[test]
fn unknown_suffix_stops_the_run() {
  let ws = Workspace::new();
  let project = ws.evaluate(
    r#"
      local env = construct.environment()
      env:shared_object('test01.f')
      env:shared_object('test09.xyz')
    "#,
  );

  let err = execute::plan_requests(&project.requests).unwrap_err();

  match err {
    ExecuteError::Plan(BuildError::UnknownSuffix(e)) => assert_eq!(e.path, PathBuf::from("test09.xyz")),
    other => panic!("expected UnknownSuffix, got {other:?}"),
  }
}

#[cfg(unix)]
#[tokio::test]
async fn unknown_suffix_builds_nothing() {
  let ws = Workspace::new().with_fortran_sources(&["test01.f"]);
  ws.write("test09.xyz", "?");
  let project = ws.evaluate(
    r#"
      local env = construct.environment { SHFORTRAN = '/bin/sh myfortran_flags.sh fortran' }
      env:shared_object('test01.f')
      env:shared_object('test09.xyz')
    "#,
  );

  let result = execute::run(&project.requests, &[], &project.root, &ExecuteConfig::default()).await;

  assert!(result.is_err());
  assert!(!ws.path().join("test01.os").exists());
  assert!(!ws.path().join("test09.os").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn failing_tool_reports_diagnostics() {
  let ws = Workspace::new();
  ws.write("bad.f", "garbage\n");
  ws.write("broken_fc.sh", "for last; do :; done\necho \"$last:1: syntax error\" >&2\nexit 3\n");
  let project = ws.evaluate("construct.environment { SHFORTRAN = '/bin/sh broken_fc.sh' }:shared_object('bad.f')");

  let result = execute::run(&project.requests, &[], &project.root, &ExecuteConfig::default())
    .await
    .unwrap();

  assert_eq!(result.failed.len(), 1);
  match &result.failed[0].error {
    BuildError::ExecutionFailure { code, stderr, .. } => {
      assert_eq!(*code, Some(3));
      assert!(stderr.contains("bad.f:1: syntax error"));
    }
    other => panic!("expected ExecutionFailure, got {other:?}"),
  }
  assert!(!ws.path().join("bad.os").exists());
}

/// A compiler that writes the object named by `-o` and prints nothing.
const OUTPUT_FLAG_COMPILER: &str = r#"
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift 2 ;;
    *) last="$1"; shift ;;
  esac
done
printf 'object for %s\n' "$last" > "$out"
"#;

#[cfg(unix)]
#[tokio::test]
async fn compiler_with_output_flag_writes_its_own_artifact() {
  let ws = Workspace::new().with_fortran_sources(&["hello.f"]);
  ws.write("fc.sh", OUTPUT_FLAG_COMPILER);
  let project = ws.evaluate(
    r#"
      local env = construct.environment {
        SHFORTRAN = '/bin/sh fc.sh',
        SHFORTRANCOM = '$SHFORTRAN -o $TARGET -c $SHFORTRANFLAGS $SOURCES',
      }
      env:shared_object('hello.f')
    "#,
  );

  let plans = execute::plan_requests(&project.requests).unwrap();
  assert_eq!(plans[0].output, OutputMode::Tool);
  assert_eq!(plans[0].command, ["/bin/sh", "fc.sh", "-o", "hello.os", "-c", "hello.f"]);

  let result = execute::execute(plans, &project.root, &ExecuteConfig::default()).await;

  assert!(result.is_success(), "{:?}", result.failed);
  assert_eq!(ws.read("hello.os"), "object for hello.f\n");
}

#[test]
fn output_path_is_deterministic() {
  let platform: Platform = linux();
  let first = naming::output_path(TargetKind::SharedObject, &platform, Path::new("test03.for"));
  let second = naming::output_path(TargetKind::SharedObject, &platform, Path::new("test03.for"));
  assert_eq!(first, second);
  assert_eq!(first, PathBuf::from("test03.os"));
}

#[test]
fn script_and_naming_agree() {
  let ws = Workspace::new();
  let project = ws.evaluate("construct.environment():shared_object('src/test03.for')");

  let artifact = build::artifact_path(&project.requests[0]).unwrap();
  assert_eq!(
    artifact,
    naming::output_path(TargetKind::SharedObject, &linux(), Path::new("src/test03.for"))
  );
}
