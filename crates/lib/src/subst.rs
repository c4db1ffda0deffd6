//! Command composition: variable substitution into argument vectors.
//!
//! Templates reference construction variables with `$NAME` or `${NAME}`.
//! Expansion produces a token list rather than a string, so that list-valued
//! variables keep element boundaries and unset variables vanish entirely.
//!
//! # Expansion Rules
//!
//! - A template is split on whitespace into words.
//! - A word that is exactly one variable reference expands to that
//!   variable's tokens:
//!   - unset: zero tokens
//!   - scalar: the scalar is treated as a template and expanded again
//!   - list: each element is expanded as a single word, in order
//! - A word mixing literal text and references (`-I$DIR`) becomes a single
//!   token built from the space-joined expansions; if the result is empty it
//!   contributes nothing.
//! - `$$` produces a literal `$`.
//!
//! # Example
//!
//! ```
//! use construct_lib::subst::compose;
//! use construct_lib::vars::{Value, VarStore};
//!
//! let mut vars = VarStore::new();
//! vars.set("SHFORTRAN", "python myfortran_flags.py fortran");
//! vars.set("SHFORTRANFLAGS", Value::list(["$FORTRANFLAGS", "-x"]));
//!
//! let tokens = compose("$SHFORTRAN -c $SHFORTRANFLAGS test01.f", &vars).unwrap();
//! assert_eq!(tokens, ["python", "myfortran_flags.py", "fortran", "-c", "-x", "test01.f"]);
//! ```

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vars::{Value, VarStore};

/// Maximum nesting of variable references before expansion is abandoned.
pub const MAX_DEPTH: usize = 32;

/// A parsed piece of a template word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  /// Literal text
  Literal(String),

  /// `$NAME` or `${NAME}`
  Var(String),
}

/// Errors that can occur while composing a command.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum CompositionError {
  #[error("unclosed variable reference at position {position} in '{word}'")]
  Unclosed { word: String, position: usize },

  #[error("empty variable name in '{0}'")]
  EmptyName(String),

  #[error("required variable ${name} is not set")]
  MissingVariable { name: String },

  #[error("variable ${name} expands recursively")]
  Recursion { name: String },

  #[error("command template ${template} expanded to an empty command")]
  EmptyCommand { template: String },
}

/// What a variable name resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<'a> {
  /// A construction variable, expanded further.
  Value(Cow<'a, Value>),

  /// Final tokens, emitted verbatim without further expansion.
  Tokens(Vec<String>),
}

/// Trait for looking up variables during composition.
pub trait Resolver {
  /// Resolve a variable name. `Ok(None)` means unset.
  fn resolve(&self, name: &str) -> Result<Option<Resolved<'_>>, CompositionError>;
}

impl Resolver for VarStore {
  fn resolve(&self, name: &str) -> Result<Option<Resolved<'_>>, CompositionError> {
    Ok(self.get(name).map(|v| Resolved::Value(Cow::Borrowed(v))))
  }
}

/// Parse a single word into literal and variable segments.
///
/// # Errors
///
/// Returns an error for an unclosed `${` or an empty `${}`.
pub fn parse_word(word: &str) -> Result<Vec<Segment>, CompositionError> {
  let mut segments = Vec::new();
  let mut literal = String::new();
  let mut chars = word.char_indices().peekable();

  while let Some((pos, ch)) = chars.next() {
    if ch != '$' {
      literal.push(ch);
      continue;
    }

    match chars.peek().copied() {
      Some((_, '$')) => {
        chars.next();
        literal.push('$');
      }
      Some((_, '{')) => {
        chars.next();
        let mut name = String::new();
        let mut closed = false;
        for (_, c) in chars.by_ref() {
          if c == '}' {
            closed = true;
            break;
          }
          name.push(c);
        }
        if !closed {
          return Err(CompositionError::Unclosed {
            word: word.to_string(),
            position: pos,
          });
        }
        if name.is_empty() {
          return Err(CompositionError::EmptyName(word.to_string()));
        }
        flush(&mut segments, &mut literal);
        segments.push(Segment::Var(name));
      }
      Some((_, c)) if c == '_' || c.is_ascii_alphabetic() => {
        let mut name = String::new();
        while let Some((_, c)) = chars.peek().copied() {
          if c == '_' || c.is_ascii_alphanumeric() {
            name.push(c);
            chars.next();
          } else {
            break;
          }
        }
        flush(&mut segments, &mut literal);
        segments.push(Segment::Var(name));
      }
      // A lone `$` (end of word, `$(`, `$1`, ...) stays literal
      _ => literal.push('$'),
    }
  }

  flush(&mut segments, &mut literal);
  Ok(segments)
}

fn flush(segments: &mut Vec<Segment>, literal: &mut String) {
  if !literal.is_empty() {
    segments.push(Segment::Literal(std::mem::take(literal)));
  }
}

/// Compose a template into tokens.
pub fn compose<R: Resolver + ?Sized>(template: &str, resolver: &R) -> Result<Vec<String>, CompositionError> {
  let mut out = Vec::new();
  expand_template(template, resolver, 0, &mut out)?;
  Ok(out)
}

/// Compose the tokens of a variable by name (`$NAME`).
pub fn compose_var<R: Resolver + ?Sized>(name: &str, resolver: &R) -> Result<Vec<String>, CompositionError> {
  let mut out = Vec::new();
  expand_var(name, resolver, 0, &mut out)?;
  Ok(out)
}

/// Compose a command held in the variable `command_var`.
///
/// Every name in `required` must expand to at least one token, and the final
/// command must not be empty.
pub fn compose_command<R: Resolver + ?Sized>(
  command_var: &str,
  required: &[String],
  resolver: &R,
) -> Result<Vec<String>, CompositionError> {
  for name in required {
    if compose_var(name, resolver)?.is_empty() {
      return Err(CompositionError::MissingVariable { name: name.clone() });
    }
  }

  if resolver.resolve(command_var)?.is_none() {
    return Err(CompositionError::MissingVariable {
      name: command_var.to_string(),
    });
  }

  let tokens = compose_var(command_var, resolver)?;
  if tokens.is_empty() {
    return Err(CompositionError::EmptyCommand {
      template: command_var.to_string(),
    });
  }
  Ok(tokens)
}

/// Expand a template and join the tokens with single spaces.
pub fn subst<R: Resolver + ?Sized>(template: &str, resolver: &R) -> Result<String, CompositionError> {
  Ok(compose(template, resolver)?.join(" "))
}

fn expand_template<R: Resolver + ?Sized>(
  template: &str,
  resolver: &R,
  depth: usize,
  out: &mut Vec<String>,
) -> Result<(), CompositionError> {
  for word in template.split_whitespace() {
    expand_word(word, resolver, depth, out)?;
  }
  Ok(())
}

fn expand_word<R: Resolver + ?Sized>(
  word: &str,
  resolver: &R,
  depth: usize,
  out: &mut Vec<String>,
) -> Result<(), CompositionError> {
  let segments = parse_word(word)?;

  if let [Segment::Var(name)] = segments.as_slice() {
    return expand_var(name, resolver, depth, out);
  }

  let mut joined = String::new();
  for segment in &segments {
    match segment {
      Segment::Literal(s) => joined.push_str(s),
      Segment::Var(name) => {
        let mut tokens = Vec::new();
        expand_var(name, resolver, depth, &mut tokens)?;
        joined.push_str(&tokens.join(" "));
      }
    }
  }

  if !joined.is_empty() {
    out.push(joined);
  }
  Ok(())
}

fn expand_var<R: Resolver + ?Sized>(
  name: &str,
  resolver: &R,
  depth: usize,
  out: &mut Vec<String>,
) -> Result<(), CompositionError> {
  if depth >= MAX_DEPTH {
    return Err(CompositionError::Recursion { name: name.to_string() });
  }

  match resolver.resolve(name)? {
    None => Ok(()),
    Some(Resolved::Tokens(tokens)) => {
      out.extend(tokens);
      Ok(())
    }
    Some(Resolved::Value(value)) => match &*value {
      Value::Scalar(s) => expand_template(s, resolver, depth + 1, out),
      Value::List(items) => {
        for item in items {
          expand_word(item, resolver, depth + 1, out)?;
        }
        Ok(())
      }
    },
  }
}
