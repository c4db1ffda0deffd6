use anyhow::Result;

use construct_lib::env::Environment;
use construct_lib::platform::Platform;

use crate::output::{Status, print_field, print_status};

pub fn cmd_info() -> Result<()> {
  println!("construct v{}", env!("CARGO_PKG_VERSION"));

  let Some(platform) = Platform::current() else {
    print_status(Status::Warning, "Could not detect platform.");
    return Ok(());
  };
  print_field("Platform", &platform.triple());

  let env = Environment::with_default_tools(platform);
  print_field("Tools", &env.tools().join(", "));
  print_field("Fortran", &env.subst("$FORTRAN")?);
  print_field("Object", &env.subst("$OBJPREFIX*$OBJSUFFIX")?);
  print_field("Shared object", &env.subst("$SHOBJPREFIX*$SHOBJSUFFIX")?);
  print_field("Tool PATH", env.tool_path().unwrap_or(""));

  let mut suffixes: Vec<_> = env
    .registry()
    .entries()
    .iter()
    .map(|e| e.suffix.as_str())
    .collect();
  suffixes.sort_unstable();
  suffixes.dedup();
  print_field("Suffixes", &suffixes.join(" "));

  Ok(())
}
