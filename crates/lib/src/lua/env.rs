//! Lua bindings for construction environments.
//!
//! ```lua
//! local env = construct.environment{ SHFORTRAN = "gfortran" }
//! env:append{ SHFORTRANFLAGS = "-x" }
//! env:shared_object{ target = "test01", source = "test01.f" }
//! ```
//!
//! Variable values convert as follows: strings and numbers become scalars,
//! sequence tables become lists of strings.

use mlua::prelude::*;
use tracing::debug;

use crate::build::{self, BuildRequest, TargetKind};
use crate::env::Environment;
use crate::lua::Requests;
use crate::vars::Value;

/// Key holding the tool process environment in variable tables.
pub const EXEC_ENV_KEY: &str = "ENV";

/// An environment as seen from Lua.
pub struct LuaEnv {
  pub env: Environment,
  requests: Requests,
}

impl LuaEnv {
  pub fn new(env: Environment, requests: Requests) -> Self {
    Self { env, requests }
  }

  /// Record build requests for each source and return their artifact paths.
  fn declare(&self, kind: TargetKind, args: LuaValue) -> LuaResult<Vec<String>> {
    let (sources, target) = parse_builder_args(args)?;
    if target.is_some() && sources.len() > 1 {
      return Err(LuaError::external("'target' can only be given with a single source"));
    }

    let mut artifacts = Vec::with_capacity(sources.len());
    for source in sources {
      let mut request = BuildRequest::new(kind, &source, self.env.clone());
      request.target = target.clone();
      let artifact = build::artifact_path(&request).map_err(LuaError::external)?;
      debug!(source = %source, artifact = %artifact.display(), kind = %kind, "build declared");
      artifacts.push(artifact.to_string_lossy().into_owned());
      self.requests.borrow_mut().push(request);
    }
    Ok(artifacts)
  }
}

impl LuaUserData for LuaEnv {
  fn add_fields<F: LuaUserDataFields<Self>>(fields: &mut F) {
    fields.add_field_method_get("tools", |_, this| Ok(this.env.tools().to_vec()));
  }

  fn add_methods<M: LuaUserDataMethods<Self>>(methods: &mut M) {
    methods.add_method_mut("append", |_, this, vars: LuaTable| {
      for_each_var(&vars, |name, value| this.env.append(name, value))
    });

    methods.add_method_mut("prepend", |_, this, vars: LuaTable| {
      for_each_var(&vars, |name, value| this.env.prepend(name, value))
    });

    methods.add_method_mut("append_unique", |_, this, vars: LuaTable| {
      for_each_var(&vars, |name, value| this.env.append_unique(name, value))
    });

    methods.add_method_mut("replace", |_, this, vars: LuaTable| apply_overrides(&mut this.env, &vars));

    methods.add_method("get", |lua, this, name: String| match this.env.get(&name) {
      Some(value) => value_to_lua(lua, value),
      None => Ok(LuaValue::Nil),
    });

    methods.add_method("subst", |_, this, template: String| {
      this.env.subst(&template).map_err(LuaError::external)
    });

    methods.add_method("clone", |lua, this, overrides: Option<LuaTable>| {
      let mut env = this.env.clone();
      if let Some(overrides) = overrides {
        apply_overrides(&mut env, &overrides)?;
      }
      lua.create_userdata(LuaEnv::new(env, this.requests.clone()))
    });

    methods.add_method("shared_object", |_, this, args: LuaValue| {
      this.declare(TargetKind::SharedObject, args)
    });

    methods.add_method("object", |_, this, args: LuaValue| {
      this.declare(TargetKind::StaticObject, args)
    });
  }
}

/// Set every variable in `vars` on `env`, replacing existing values.
///
/// The `ENV` key sets variables of the tool process environment instead.
pub fn apply_overrides(env: &mut Environment, vars: &LuaTable) -> LuaResult<()> {
  for pair in vars.pairs::<String, LuaValue>() {
    let (name, value) = pair?;
    if name == EXEC_ENV_KEY {
      apply_exec_env(env, value)?;
    } else {
      let value = lua_to_value(&name, value)?;
      env.set(name, value);
    }
  }
  Ok(())
}

/// Merge an `ENV` table into the tool process environment.
pub fn apply_exec_env(env: &mut Environment, value: LuaValue) -> LuaResult<()> {
  let table = match value {
    LuaValue::Table(t) => t,
    _ => return Err(LuaError::external("ENV must be a table of strings")),
  };
  for pair in table.pairs::<String, String>() {
    let (key, value) = pair?;
    env.set_exec_env(key, value);
  }
  Ok(())
}

fn for_each_var(vars: &LuaTable, mut f: impl FnMut(String, Value)) -> LuaResult<()> {
  for pair in vars.pairs::<String, LuaValue>() {
    let (name, value) = pair?;
    let value = lua_to_value(&name, value)?;
    f(name, value);
  }
  Ok(())
}

/// Convert the Lua value of variable `name` to a variable value.
///
/// Tables must be plain sequences. Keyed entries have no list form and are
/// rejected.
pub fn lua_to_value(name: &str, value: LuaValue) -> LuaResult<Value> {
  match value {
    LuaValue::Table(t) => {
      let len = t.raw_len();
      if t.pairs::<LuaValue, LuaValue>().count() != len {
        return Err(unsupported_value(name, "table with non-sequence keys"));
      }
      let mut items = Vec::with_capacity(len);
      for item in t.sequence_values::<LuaValue>() {
        items.push(lua_to_scalar(name, item?)?);
      }
      Ok(Value::List(items))
    }
    other => Ok(Value::Scalar(lua_to_scalar(name, other)?)),
  }
}

fn lua_to_scalar(name: &str, value: LuaValue) -> LuaResult<String> {
  match value {
    LuaValue::String(s) => Ok(s.to_str()?.to_string()),
    LuaValue::Integer(i) => Ok(i.to_string()),
    LuaValue::Number(n) => Ok(n.to_string()),
    LuaValue::Boolean(b) => Ok(b.to_string()),
    other => Err(unsupported_value(name, other.type_name())),
  }
}

fn unsupported_value(name: &str, kind: &str) -> LuaError {
  LuaError::external(format!("unsupported variable value for {name}: {kind}"))
}

/// Convert a variable value to a Lua string or sequence table.
pub fn value_to_lua(lua: &Lua, value: &Value) -> LuaResult<LuaValue> {
  match value {
    Value::Scalar(s) => Ok(LuaValue::String(lua.create_string(s)?)),
    Value::List(items) => Ok(LuaValue::Table(lua.create_sequence_from(items.iter().map(String::as_str))?)),
  }
}

/// Accepts `"a.f"`, `{ "a.f", "b.f" }`, or `{ source = ..., target = ... }`.
fn parse_builder_args(args: LuaValue) -> LuaResult<(Vec<String>, Option<String>)> {
  match args {
    LuaValue::String(s) => Ok((vec![s.to_str()?.to_string()], None)),
    LuaValue::Table(t) => {
      let target: Option<String> = t.get("target")?;
      let sources = match t.get::<LuaValue>("source")? {
        LuaValue::Nil => string_list(&t)?,
        LuaValue::String(s) => vec![s.to_str()?.to_string()],
        LuaValue::Table(list) => string_list(&list)?,
        other => {
          return Err(LuaError::external(format!(
            "'source' must be a string or a list of strings, got {}",
            other.type_name()
          )));
        }
      };
      if sources.is_empty() {
        return Err(LuaError::external("builder requires at least one source"));
      }
      Ok((sources, target))
    }
    _ => Err(LuaError::external("builder expects a source string or a table with a 'source' field")),
  }
}

fn string_list(table: &LuaTable) -> LuaResult<Vec<String>> {
  table.sequence_values::<String>().collect()
}
