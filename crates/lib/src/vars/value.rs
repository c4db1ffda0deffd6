use std::fmt;

use serde::{Deserialize, Serialize};

/// A construction variable value.
///
/// Scalars are split on whitespace when composed into a command line; list
/// elements contribute exactly one token each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
  Scalar(String),
  List(Vec<String>),
}

impl Value {
  /// Create a list value from anything iterable over string-likes.
  pub fn list<I, S>(items: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self::List(items.into_iter().map(Into::into).collect())
  }

  /// Returns true for an empty scalar or an empty list.
  pub fn is_empty(&self) -> bool {
    match self {
      Self::Scalar(s) => s.is_empty(),
      Self::List(items) => items.is_empty(),
    }
  }

  /// Convert to list elements, splitting a scalar on whitespace.
  ///
  /// This is the promotion applied when a scalar takes part in an append or
  /// prepend: `"-O2 -g"` becomes `["-O2", "-g"]`, `"-x"` becomes `["-x"]`.
  pub fn into_elements(self) -> Vec<String> {
    match self {
      Self::Scalar(s) => s.split_whitespace().map(str::to_string).collect(),
      Self::List(items) => items,
    }
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Scalar(s) => f.write_str(s),
      Self::List(items) => f.write_str(&items.join(" ")),
    }
  }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self {
    Self::Scalar(s.to_string())
  }
}

impl From<String> for Value {
  fn from(s: String) -> Self {
    Self::Scalar(s)
  }
}

impl From<Vec<String>> for Value {
  fn from(items: Vec<String>) -> Self {
    Self::List(items)
  }
}

impl From<Vec<&str>> for Value {
  fn from(items: Vec<&str>) -> Self {
    Self::list(items)
  }
}

impl<const N: usize> From<[&str; N]> for Value {
  fn from(items: [&str; N]) -> Self {
    Self::list(items)
  }
}
