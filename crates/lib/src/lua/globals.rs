//! The `construct` global table.
//!
//! - `construct.platform` - Platform triple (e.g., "x86_64-linux")
//! - `construct.os` - Operating system name (e.g., "darwin", "linux", "windows")
//! - `construct.arch` - CPU architecture (e.g., "x86_64", "aarch64")
//! - `construct.dir` - Directory of the script being evaluated
//! - `construct.environment{}` - Create a construction environment

use mlua::prelude::*;

use crate::consts::APP_NAME;
use crate::env::Environment;
use crate::lua::Requests;
use crate::lua::env::{EXEC_ENV_KEY, LuaEnv, apply_exec_env, lua_to_value};
use crate::platform::Platform;
use crate::tool::{self, DEFAULT_TOOLS};

/// Key selecting the tools applied to a new environment.
const TOOLS_KEY: &str = "tools";

/// Register the `construct` global table in the Lua runtime.
pub fn register_globals(lua: &Lua, platform: Platform, requests: Requests) -> LuaResult<()> {
  let construct = lua.create_table()?;

  construct.set("platform", platform.triple())?;
  construct.set("os", platform.os.as_str())?;
  construct.set("arch", platform.arch.as_str())?;
  construct.set("dir", "")?;

  // construct.environment{ VAR = value, tools = { ... }, ENV = { ... } }
  let environment = lua.create_function(move |lua, options: Option<LuaTable>| {
    let tools = match &options {
      Some(options) => match options.get::<Option<Vec<String>>>(TOOLS_KEY)? {
        Some(tools) => tools,
        None => default_tools(),
      },
      None => default_tools(),
    };

    let mut env = Environment::new(platform);

    // ENV first: tools search its PATH when detecting compilers
    if let Some(exec_env) = options.as_ref().map(|s| s.get::<LuaValue>(EXEC_ENV_KEY)).transpose()?
      && !exec_env.is_nil()
    {
      apply_exec_env(&mut env, exec_env)?;
    }

    for name in &tools {
      let tool = tool::by_name(name).map_err(LuaError::external)?;
      env.apply_tool(tool.as_ref());
    }

    // Explicit values override tool defaults
    if let Some(options) = options {
      for pair in options.pairs::<String, LuaValue>() {
        let (name, value) = pair?;
        if name != TOOLS_KEY && name != EXEC_ENV_KEY {
          let value = lua_to_value(&name, value)?;
          env.set(name, value);
        }
      }
    }

    lua.create_userdata(LuaEnv::new(env, requests.clone()))
  })?;
  construct.set("environment", environment)?;

  lua.globals().set(APP_NAME, construct)?;

  Ok(())
}

fn default_tools() -> Vec<String> {
  DEFAULT_TOOLS.iter().map(|t| t.to_string()).collect()
}
