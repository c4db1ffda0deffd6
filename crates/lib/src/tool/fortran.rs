//! Fortran-family compilers.
//!
//! Each dialect `D` gets its own compiler, flags and command variables:
//!
//! | Variable     | Default                                                                 |
//! |--------------|-------------------------------------------------------------------------|
//! | `D`          | detected compiler for `FORTRAN`, `$FORTRAN` for the others              |
//! | `SHD`        | `$D`                                                                    |
//! | `SHDFLAGS`   | `["$DFLAGS"]`                                                           |
//! | `DCOM`       | `$D -c $DFLAGS $_FORTRANINCFLAGS $SOURCES`                              |
//! | `DPPCOM`     | `$D -c $DFLAGS $CPPFLAGS $_CPPDEFFLAGS $_FORTRANINCFLAGS $SOURCES`      |
//! | `SHDCOM`     | `$SHD -c $SHDFLAGS $_FORTRANINCFLAGS $SOURCES`                          |
//! | `SHDPPCOM`   | `$SHD -c $SHDFLAGS $CPPFLAGS $_CPPDEFFLAGS $_FORTRANINCFLAGS $SOURCES`  |
//!
//! Upper-case suffixes (and `.fpp`) mark sources that need the C
//! preprocessor and route to the `*PPCOM` templates.
//!
//! None of the default templates name `$TARGET`, so the artifact is whatever
//! the compiler prints on stdout. Real compilers print nothing and write
//! their own object file next to the source instead. With them, put the
//! target in the template so the compiler writes the artifact itself:
//!
//! ```lua
//! env:replace { SHFORTRANCOM = '$SHFORTRAN -o $TARGET -c $SHFORTRANFLAGS $_FORTRANINCFLAGS $SOURCES' }
//! ```

use tracing::debug;

use crate::build::TargetKind;
use crate::env::{Environment, Generator};
use crate::registry::BuilderAction;
use crate::tool::Tool;
use crate::vars::{Value, VarStore};

/// Compilers searched for, in order of preference.
pub const COMPILERS: &[&str] = &["gfortran", "g77", "ifx", "ifort", "ifl", "f95", "f90", "f77"];

/// Compiler used when none of [`COMPILERS`] is found.
pub const FALLBACK_COMPILER: &str = "gfortran";

/// A Fortran dialect and the suffixes that select it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
  pub name: &'static str,
  pub suffixes: &'static [&'static str],
  pub pp_suffixes: &'static [&'static str],
}

pub const DIALECTS: &[Dialect] = &[
  Dialect {
    name: "FORTRAN",
    suffixes: &[".f", ".for", ".ftn"],
    pp_suffixes: &[".F", ".FOR", ".FTN", ".fpp", ".FPP"],
  },
  Dialect {
    name: "F77",
    suffixes: &[".f77"],
    pp_suffixes: &[".F77"],
  },
  Dialect {
    name: "F90",
    suffixes: &[".f90"],
    pp_suffixes: &[".F90"],
  },
  Dialect {
    name: "F95",
    suffixes: &[".f95"],
    pp_suffixes: &[".F95"],
  },
  Dialect {
    name: "F03",
    suffixes: &[".f03"],
    pp_suffixes: &[".F03"],
  },
  Dialect {
    name: "F08",
    suffixes: &[".f08"],
    pp_suffixes: &[".F08"],
  },
];

pub struct Fortran;

impl Tool for Fortran {
  fn name(&self) -> &'static str {
    "fortran"
  }

  fn generate(&self, env: &mut Environment) {
    let compiler = detect(env.tool_path());
    debug!(compiler = %compiler, "fortran compiler");

    let vars = env.vars_mut();
    vars.set("FORTRAN", compiler);
    vars.set_default("INCPREFIX", "-I");
    vars.set_default("INCSUFFIX", "");
    for dialect in DIALECTS {
      seed_dialect(vars, dialect.name);
    }

    env.set_generator(
      "_FORTRANINCFLAGS",
      Generator::affix("FORTRANPATH", "INCPREFIX", "INCSUFFIX"),
    );

    let registry = env.registry_mut();
    for dialect in DIALECTS {
      let d = dialect.name;
      for (kind, compiler) in [
        (TargetKind::StaticObject, d.to_string()),
        (TargetKind::SharedObject, format!("SH{d}")),
      ] {
        for suffix in dialect.suffixes {
          let action = BuilderAction::new("fortran", format!("{compiler}COM")).require(&compiler);
          registry.register(kind, *suffix, action);
        }
        for suffix in dialect.pp_suffixes {
          let action = BuilderAction::new("fortran", format!("{compiler}PPCOM")).require(&compiler);
          registry.register(kind, *suffix, action);
        }
      }
    }
  }
}

fn seed_dialect(vars: &mut VarStore, d: &str) {
  if d != "FORTRAN" {
    vars.set(d, "$FORTRAN");
  }
  vars.set(format!("SH{d}"), format!("${d}"));
  vars.set(format!("SH{d}FLAGS"), Value::list([format!("${d}FLAGS")]));
  vars.set(format!("{d}COM"), format!("${d} -c ${d}FLAGS $_FORTRANINCFLAGS $SOURCES"));
  vars.set(
    format!("{d}PPCOM"),
    format!("${d} -c ${d}FLAGS $CPPFLAGS $_CPPDEFFLAGS $_FORTRANINCFLAGS $SOURCES"),
  );
  vars.set(
    format!("SH{d}COM"),
    format!("$SH{d} -c $SH{d}FLAGS $_FORTRANINCFLAGS $SOURCES"),
  );
  vars.set(
    format!("SH{d}PPCOM"),
    format!("$SH{d} -c $SH{d}FLAGS $CPPFLAGS $_CPPDEFFLAGS $_FORTRANINCFLAGS $SOURCES"),
  );
}

/// Find the first available compiler on a search path.
pub fn detect(path: Option<&str>) -> String {
  let found = COMPILERS
    .iter()
    .find(|name| which::which_in(name, path, ".").is_ok())
    .copied()
    .unwrap_or(FALLBACK_COMPILER);
  found.to_string()
}
