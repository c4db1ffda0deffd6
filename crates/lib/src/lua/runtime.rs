use std::path::Path;

use mlua::prelude::*;

use crate::lua::{Requests, globals};
use crate::platform::Platform;

/// Create a new Lua runtime with the `construct` global registered.
///
/// Build requests declared by scripts run in this runtime are pushed onto
/// `requests`.
pub fn create_runtime(platform: Platform, requests: Requests) -> LuaResult<Lua> {
  let lua = Lua::new();
  globals::register_globals(&lua, platform, requests)?;
  Ok(lua)
}

/// Load and execute a Lua file at the given path.
///
/// Sets `construct.dir` to the directory of the loaded file and adds that
/// directory's `lua/` folder to `package.path`.
pub fn load_file(lua: &Lua, path: &Path) -> LuaResult<LuaValue> {
  let canonical_path = dunce::canonicalize(path)
    .map_err(|e| LuaError::external(format!("cannot canonicalize '{}': {}", path.display(), e)))?;
  let content = std::fs::read_to_string(&canonical_path)
    .map_err(|e| LuaError::external(format!("cannot read '{}': {}", canonical_path.display(), e)))?;

  let dir = canonical_path
    .parent()
    .unwrap_or(Path::new(""))
    .to_string_lossy()
    .to_string();

  let package = lua.globals().get::<LuaTable>("package")?;
  let package_path = package.get::<String>("path")?;
  let lua_dir = dir.replace('\\', "/");
  package.set("path", format!("{lua_dir}/lua/?.lua;{lua_dir}/lua/?/init.lua;{package_path}"))?;

  lua.globals().get::<LuaTable>("construct")?.set("dir", dir)?;

  lua
    .load(&content)
    .set_name(format!("@{}", canonical_path.display()))
    .eval::<LuaValue>()
}
