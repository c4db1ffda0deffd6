//! Construction variables.
//!
//! A [`VarStore`] maps variable names to [`Value`]s. It is the configuration
//! scope that command templates are expanded against.
//!
//! # Append Semantics
//!
//! Appending always produces a list:
//! - an unset variable starts out as an empty list
//! - a scalar is promoted to a list (split on whitespace) before appending
//! - an appended scalar contributes its whitespace-separated words
//!
//! ```
//! use construct_lib::vars::{Value, VarStore};
//!
//! let mut vars = VarStore::new();
//! vars.append("FORTRANFLAGS", "-x");
//! vars.append("FORTRANFLAGS", "-O2 -g");
//! assert_eq!(vars.get("FORTRANFLAGS"), Some(&Value::list(["-x", "-O2", "-g"])));
//! ```

mod value;

pub use value::Value;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mapping from variable name to value.
///
/// Reads of unset names return `None`; they are never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarStore {
  vars: BTreeMap<String, Value>,
}

impl VarStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, name: &str) -> Option<&Value> {
    self.vars.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.vars.contains_key(name)
  }

  /// Set a variable, replacing any previous value.
  pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
    self.vars.insert(name.into(), value.into());
  }

  /// Set a variable only if it is not already present.
  pub fn set_default(&mut self, name: impl Into<String>, value: impl Into<Value>) {
    self.vars.entry(name.into()).or_insert_with(|| value.into());
  }

  pub fn remove(&mut self, name: &str) -> Option<Value> {
    self.vars.remove(name)
  }

  /// Append to a variable. The result is always a list.
  pub fn append(&mut self, name: impl Into<String>, value: impl Into<Value>) {
    let (name, mut items) = self.take_elements(name.into());
    items.extend(value.into().into_elements());
    self.vars.insert(name, Value::List(items));
  }

  /// Prepend to a variable. The result is always a list.
  pub fn prepend(&mut self, name: impl Into<String>, value: impl Into<Value>) {
    let (name, existing) = self.take_elements(name.into());
    let mut items = value.into().into_elements();
    items.extend(existing);
    self.vars.insert(name, Value::List(items));
  }

  /// Append only the elements not already present in the variable.
  pub fn append_unique(&mut self, name: impl Into<String>, value: impl Into<Value>) {
    let (name, mut items) = self.take_elements(name.into());
    for element in value.into().into_elements() {
      if !items.contains(&element) {
        items.push(element);
      }
    }
    self.vars.insert(name, Value::List(items));
  }

  /// Iterate over all variables in name order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
    self.vars.iter().map(|(k, v)| (k.as_str(), v))
  }

  pub fn len(&self) -> usize {
    self.vars.len()
  }

  pub fn is_empty(&self) -> bool {
    self.vars.is_empty()
  }

  /// Remove a variable and return its current elements (empty if unset).
  fn take_elements(&mut self, name: String) -> (String, Vec<String>) {
    let existing = self.vars.remove(&name).map(Value::into_elements).unwrap_or_default();
    (name, existing)
  }
}

impl<K, V> FromIterator<(K, V)> for VarStore
where
  K: Into<String>,
  V: Into<Value>,
{
  fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
    Self {
      vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
    }
  }
}
