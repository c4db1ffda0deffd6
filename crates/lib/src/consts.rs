/// Application name, used as the Lua global table name.
pub const APP_NAME: &str = "construct";

/// Build script looked up in the build root when none is given.
pub const DEFAULT_SCRIPT: &str = "construct.lua";
