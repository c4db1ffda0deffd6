//! Artifact naming conventions.
//!
//! An artifact name is `<prefix><stem><suffix>`, where the stem is the
//! source's file name with its suffix stripped. Prefix and suffix depend only
//! on the target kind and the platform.

use std::path::{Component, Path, PathBuf};

use crate::build::TargetKind;
use crate::platform::{Os, Platform};

/// Prefix and suffix applied to a source stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Convention {
  pub prefix: &'static str,
  pub suffix: &'static str,
}

/// The default naming convention for a target kind on an OS.
pub fn convention(kind: TargetKind, os: Os) -> Convention {
  match (kind, os) {
    (_, Os::Windows) => Convention {
      prefix: "",
      suffix: ".obj",
    },
    (TargetKind::StaticObject, _) => Convention {
      prefix: "",
      suffix: ".o",
    },
    (TargetKind::SharedObject, _) => Convention {
      prefix: "",
      suffix: ".os",
    },
  }
}

/// The default artifact path for a source, relative to the build root.
///
/// ```
/// use std::path::{Path, PathBuf};
/// use construct_lib::build::{TargetKind, naming};
/// use construct_lib::platform::{Arch, Os, Platform};
///
/// let linux = Platform::new(Arch::X86_64, Os::Linux);
/// let path = naming::output_path(TargetKind::SharedObject, &linux, Path::new("src/test03.for"));
/// assert_eq!(path, PathBuf::from("test03.os"));
/// ```
pub fn output_path(kind: TargetKind, platform: &Platform, source: &Path) -> PathBuf {
  let Convention { prefix, suffix } = convention(kind, platform.os);
  artifact_name(prefix, suffix, source)
}

/// `<prefix><stem><suffix>` for a source path. Directories are dropped.
pub fn artifact_name(prefix: &str, suffix: &str, source: &Path) -> PathBuf {
  let stem = source.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
  PathBuf::from(format!("{prefix}{stem}{suffix}"))
}

/// Apply a convention to an explicit target name.
///
/// The prefix and suffix are only added when the name does not already carry
/// them. The target's directory is kept.
pub fn target_name(prefix: &str, suffix: &str, target: &str) -> PathBuf {
  let path = Path::new(target);
  let file_name = path.file_name().map(|s| s.to_string_lossy()).unwrap_or_default();

  let mut name = String::new();
  if !file_name.starts_with(prefix) {
    name.push_str(prefix);
  }
  name.push_str(&file_name);
  if !file_name.ends_with(suffix) {
    name.push_str(suffix);
  }

  match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => normalize(&parent.join(name)),
    _ => PathBuf::from(name),
  }
}

/// Lexically clean a path: `.` components are dropped and `dir/..` pairs
/// collapse. Leading `..` components are kept. The filesystem is not consulted.
///
/// ```
/// use std::path::{Path, PathBuf};
/// use construct_lib::build::naming::normalize;
///
/// assert_eq!(normalize(Path::new("./out/../a.os")), PathBuf::from("a.os"));
/// ```
pub fn normalize(path: &Path) -> PathBuf {
  let mut parts: Vec<Component> = Vec::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => match parts.last() {
        Some(Component::Normal(_)) => {
          parts.pop();
        }
        Some(Component::RootDir | Component::Prefix(_)) => {}
        _ => parts.push(component),
      },
      _ => parts.push(component),
    }
  }

  if parts.is_empty() {
    return PathBuf::from(".");
  }
  parts.iter().collect()
}
