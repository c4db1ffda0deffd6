//! Suffix registry: which builder action applies to a source file.
//!
//! Entries are keyed by target kind and by the source suffix including the
//! dot. Lookup is an exact, case-sensitive string match: `.f` and `.F` are
//! distinct entries, and tools use that to route upper-case suffixes to
//! their preprocessing command.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::build::TargetKind;

/// The action a builder performs for a registered suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderAction {
  /// Name of the tool that registered this action (e.g. "fortran").
  pub tool: String,

  /// Variable holding the command template (e.g. "SHFORTRANCOM").
  pub command: String,

  /// Variables that must expand to something for the command to be valid.
  pub required: Vec<String>,
}

impl BuilderAction {
  pub fn new(tool: impl Into<String>, command: impl Into<String>) -> Self {
    Self {
      tool: tool.into(),
      command: command.into(),
      required: Vec::new(),
    }
  }

  pub fn require(mut self, name: impl Into<String>) -> Self {
    self.required.push(name.into());
    self
  }
}

/// A single registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixEntry {
  pub kind: TargetKind,
  pub suffix: String,
  pub action: BuilderAction,
}

/// No registry entry matched a source file.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("don't know how to build a {kind} from '{}': no builder for suffix {suffix:?}", .path.display())]
pub struct UnknownSuffix {
  pub kind: TargetKind,
  pub path: PathBuf,
  pub suffix: Option<String>,
}

/// Ordered table of suffix entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixRegistry {
  entries: Vec<SuffixEntry>,
}

impl SuffixRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register an action for a suffix.
  ///
  /// Registering a suffix that already exists for the kind replaces the
  /// action but keeps the entry's position.
  pub fn register(&mut self, kind: TargetKind, suffix: impl Into<String>, action: BuilderAction) {
    let suffix = suffix.into();
    match self.entries.iter_mut().find(|e| e.kind == kind && e.suffix == suffix) {
      Some(entry) => entry.action = action,
      None => self.entries.push(SuffixEntry { kind, suffix, action }),
    }
  }

  /// Remove the entry for a suffix, returning it if present.
  pub fn unregister(&mut self, kind: TargetKind, suffix: &str) -> Option<SuffixEntry> {
    let index = self.entries.iter().position(|e| e.kind == kind && e.suffix == suffix)?;
    Some(self.entries.remove(index))
  }

  /// Look up the entry for an exact suffix (including the dot).
  pub fn lookup(&self, kind: TargetKind, suffix: &str) -> Option<&SuffixEntry> {
    self.entries.iter().find(|e| e.kind == kind && e.suffix == suffix)
  }

  /// Resolve the entry for a source path.
  ///
  /// # Errors
  ///
  /// Returns [`UnknownSuffix`] when the path has no suffix or no entry
  /// matches it.
  pub fn resolve(&self, kind: TargetKind, path: &Path) -> Result<&SuffixEntry, UnknownSuffix> {
    let suffix = suffix_of(path);
    if let Some(entry) = suffix.as_deref().and_then(|s| self.lookup(kind, s)) {
      return Ok(entry);
    }
    Err(UnknownSuffix {
      kind,
      path: path.to_path_buf(),
      suffix,
    })
  }

  /// Registered suffixes for a kind, in registration order.
  pub fn suffixes(&self, kind: TargetKind) -> impl Iterator<Item = &str> {
    self
      .entries
      .iter()
      .filter(move |e| e.kind == kind)
      .map(|e| e.suffix.as_str())
  }

  pub fn entries(&self) -> &[SuffixEntry] {
    &self.entries
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

/// The suffix of a path including the leading dot, if it has one.
pub fn suffix_of(path: &Path) -> Option<String> {
  path
    .extension()
    .map(|ext| format!(".{}", ext.to_string_lossy()))
}
