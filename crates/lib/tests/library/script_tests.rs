//! Tests for the `construct` Lua API.

use construct_lib::build::{self, TargetKind};
use mlua::prelude::*;

use super::common::create_test_runtime;

mod variables {
  use super::*;

  #[test]
  fn append_to_unset_yields_one_token() -> LuaResult<()> {
    let (lua, _) = create_test_runtime()?;

    lua
      .load(
        r#"
          local env = construct.environment { FORTRAN = 'fc' }
          env:append { FORTRANFLAGS = { '-x' } }
          assert(env:subst('$FORTRANFLAGS') == '-x', env:subst('$FORTRANFLAGS'))
          local flags = env:get('FORTRANFLAGS')
          assert(type(flags) == 'table' and #flags == 1, 'expected a one element list')
        "#,
      )
      .exec()?;

    Ok(())
  }

  #[test]
  fn appends_keep_order() -> LuaResult<()> {
    let (lua, _) = create_test_runtime()?;

    lua
      .load(
        r#"
          local env = construct.environment()
          env:append { SHFORTRANFLAGS = { '-x' } }
          env:append { SHFORTRANFLAGS = { '-x' } }
          env:append { SHFORTRANFLAGS = '-O2 -g' }
          env:prepend { SHFORTRANFLAGS = { '-first' } }
          local flags = env:get('SHFORTRANFLAGS')
          assert(table.concat(flags, ' ') == '-first $FORTRANFLAGS -x -x -O2 -g', table.concat(flags, ' '))
        "#,
      )
      .exec()?;

    Ok(())
  }

  #[test]
  fn append_unique_skips_present_values() -> LuaResult<()> {
    let (lua, _) = create_test_runtime()?;

    lua
      .load(
        r#"
          local env = construct.environment { tools = {} }
          env:append_unique { CPPDEFINES = { 'A', 'B' } }
          env:append_unique { CPPDEFINES = { 'B', 'C' } }
          assert(env:subst('$_CPPDEFFLAGS') == '-DA -DB -DC', env:subst('$_CPPDEFFLAGS'))
        "#,
      )
      .exec()?;

    Ok(())
  }

  #[test]
  fn unset_placeholders_expand_to_nothing() -> LuaResult<()> {
    let (lua, _) = create_test_runtime()?;
    let result: String = lua
      .load(r#"return construct.environment { tools = {} }:subst('a $NOPE ${NOPE} b')"#)
      .eval()?;
    assert_eq!(result, "a b");
    Ok(())
  }

  #[test]
  fn include_paths_become_flags() -> LuaResult<()> {
    let (lua, _) = create_test_runtime()?;
    let result: String = lua
      .load(
        r#"
          local env = construct.environment()
          env:append { FORTRANPATH = { 'include', 'mods' } }
          return env:subst('$_FORTRANINCFLAGS')
        "#,
      )
      .eval()?;
    assert_eq!(result, "-Iinclude -Imods");
    Ok(())
  }

  #[test]
  fn unclosed_reference_is_error() -> LuaResult<()> {
    let (lua, _) = create_test_runtime()?;
    let result = lua.load(r#"construct.environment():subst('${FORTRAN')"#).exec();
    assert!(result.is_err());
    Ok(())
  }
}

mod environments {
  use super::*;

  #[test]
  fn clone_does_not_affect_original() -> LuaResult<()> {
    let (lua, _) = create_test_runtime()?;

    lua
      .load(
        r#"
          local base = construct.environment { FORTRAN = 'fc' }
          local debug = base:clone { FORTRAN = 'fc-debug' }
          debug:append { FORTRANFLAGS = { '-g' } }
          assert(base:subst('$FORTRAN $FORTRANFLAGS') == 'fc', base:subst('$FORTRAN $FORTRANFLAGS'))
          assert(debug:subst('$FORTRAN $FORTRANFLAGS') == 'fc-debug -g')
        "#,
      )
      .exec()?;

    Ok(())
  }

  #[test]
  fn requests_snapshot_the_environment() -> LuaResult<()> {
    let (lua, requests) = create_test_runtime()?;

    lua
      .load(
        r#"
          local env = construct.environment { SHFORTRAN = 'fc' }
          env:shared_object('a.f')
          env:replace { SHFORTRAN = 'other' }
          env:shared_object('b.f')
        "#,
      )
      .exec()?;

    let requests = requests.borrow();
    let commands: Vec<_> = requests
      .iter()
      .map(|r| build::plan(r).map(|p| p.command[0].clone()))
      .collect::<Result<_, _>>()
      .map_err(LuaError::external)?;
    assert_eq!(commands, vec!["fc", "other"]);
    Ok(())
  }

  #[test]
  fn builders_return_artifact_paths() -> LuaResult<()> {
    let (lua, requests) = create_test_runtime()?;

    let artifacts: Vec<String> = lua
      .load(
        r#"
          local env = construct.environment()
          local shared = env:shared_object { source = { 'a.f', 'b.F90' } }
          local static = env:object { target = 'out/main', source = 'main.f' }
          return { shared[1], shared[2], static[1] }
        "#,
      )
      .eval()?;

    assert_eq!(artifacts, vec!["a.os", "b.os", "out/main.o"]);
    let kinds: Vec<_> = requests.borrow().iter().map(|r| r.kind).collect();
    assert_eq!(
      kinds,
      vec![TargetKind::SharedObject, TargetKind::SharedObject, TargetKind::StaticObject]
    );
    Ok(())
  }

  #[test]
  fn target_with_many_sources_is_error() -> LuaResult<()> {
    let (lua, _) = create_test_runtime()?;
    let result = lua
      .load(r#"construct.environment():object { target = 'x', source = { 'a.f', 'b.f' } }"#)
      .exec();
    assert!(result.is_err());
    Ok(())
  }
}
