//! Construction environments.
//!
//! An [`Environment`] bundles everything a builder needs to turn a source
//! into an artifact: construction variables, the suffix registry, generated
//! variables, and the process environment handed to tools.
//!
//! Environments are cheap to clone. All state sits behind `Arc`s and is
//! copied on first write, so a clone can be modified without affecting its
//! parent, and a snapshot captured by a build request never changes.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::build::{BuildRequest, TargetKind, naming};
use crate::platform::Platform;
use crate::registry::SuffixRegistry;
use crate::subst::{self, CompositionError, Resolved, Resolver};
use crate::tool::{self, Tool, ToolError};
use crate::vars::{Value, VarStore};

/// A variable computed from other variables at composition time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generator {
  /// Each element of `list` wrapped in the expansions of `prefix` and
  /// `suffix` (e.g. `FORTRANPATH` with `INCPREFIX` gives `-Idir` tokens).
  Affix { list: String, prefix: String, suffix: String },
}

impl Generator {
  pub fn affix(list: impl Into<String>, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
    Self::Affix {
      list: list.into(),
      prefix: prefix.into(),
      suffix: suffix.into(),
    }
  }

  /// Compute the generated tokens against a variable store.
  pub fn generate(&self, vars: &VarStore) -> Result<Vec<String>, CompositionError> {
    match self {
      Self::Affix { list, prefix, suffix } => {
        let prefix = subst::compose_var(prefix, vars)?.join(" ");
        let suffix = subst::compose_var(suffix, vars)?.join(" ");
        Ok(
          subst::compose_var(list, vars)?
            .into_iter()
            .map(|item| format!("{prefix}{item}{suffix}"))
            .collect(),
        )
      }
    }
  }
}

/// A construction environment.
#[derive(Debug, Clone)]
pub struct Environment {
  platform: Platform,
  vars: Arc<VarStore>,
  registry: Arc<SuffixRegistry>,
  generators: Arc<BTreeMap<String, Generator>>,
  exec_env: Arc<BTreeMap<String, String>>,
  tools: Vec<String>,
}

impl Environment {
  /// An environment with platform naming defaults and no tools.
  pub fn new(platform: Platform) -> Self {
    let mut vars = VarStore::new();
    for kind in [TargetKind::StaticObject, TargetKind::SharedObject] {
      let convention = naming::convention(kind, platform.os);
      vars.set(kind.suffix_var(), convention.suffix);
    }
    vars.set("OBJPREFIX", naming::convention(TargetKind::StaticObject, platform.os).prefix);
    vars.set("SHOBJPREFIX", "$OBJPREFIX");
    vars.set("CPPDEFPREFIX", "-D");
    vars.set("CPPDEFSUFFIX", "");

    let mut generators = BTreeMap::new();
    generators.insert(
      "_CPPDEFFLAGS".to_string(),
      Generator::affix("CPPDEFINES", "CPPDEFPREFIX", "CPPDEFSUFFIX"),
    );

    let mut exec_env = BTreeMap::new();
    exec_env.insert("PATH".to_string(), platform.os.default_tool_path().to_string());

    Self {
      platform,
      vars: Arc::new(vars),
      registry: Arc::new(SuffixRegistry::new()),
      generators: Arc::new(generators),
      exec_env: Arc::new(exec_env),
      tools: Vec::new(),
    }
  }

  /// An environment with the named tools applied in order.
  ///
  /// # Errors
  ///
  /// Returns [`ToolError::Unknown`] if a tool name is not recognized.
  pub fn with_tools<S: AsRef<str>>(platform: Platform, tools: &[S]) -> Result<Self, ToolError> {
    let mut env = Self::new(platform);
    for name in tools {
      let tool = tool::by_name(name.as_ref())?;
      env.apply_tool(tool.as_ref());
    }
    Ok(env)
  }

  /// An environment with the default tool set.
  pub fn with_default_tools(platform: Platform) -> Self {
    let mut env = Self::new(platform);
    for tool in tool::default_tools() {
      env.apply_tool(tool.as_ref());
    }
    env
  }

  /// Let a tool seed variables and register its suffixes.
  pub fn apply_tool(&mut self, tool: &dyn Tool) {
    debug!(tool = tool.name(), "applying tool");
    tool.generate(self);
    if !self.tools.iter().any(|t| t == tool.name()) {
      self.tools.push(tool.name().to_string());
    }
  }

  pub fn platform(&self) -> &Platform {
    &self.platform
  }

  /// Names of the tools applied to this environment.
  pub fn tools(&self) -> &[String] {
    &self.tools
  }

  pub fn vars(&self) -> &VarStore {
    &self.vars
  }

  pub fn vars_mut(&mut self) -> &mut VarStore {
    Arc::make_mut(&mut self.vars)
  }

  pub fn registry(&self) -> &SuffixRegistry {
    &self.registry
  }

  pub fn registry_mut(&mut self) -> &mut SuffixRegistry {
    Arc::make_mut(&mut self.registry)
  }

  pub fn get(&self, name: &str) -> Option<&Value> {
    self.vars.get(name)
  }

  pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
    self.vars_mut().set(name, value);
  }

  pub fn append(&mut self, name: impl Into<String>, value: impl Into<Value>) {
    self.vars_mut().append(name, value);
  }

  pub fn prepend(&mut self, name: impl Into<String>, value: impl Into<Value>) {
    self.vars_mut().prepend(name, value);
  }

  pub fn append_unique(&mut self, name: impl Into<String>, value: impl Into<Value>) {
    self.vars_mut().append_unique(name, value);
  }

  /// Register a generated variable. It shadows any plain variable of the
  /// same name.
  pub fn set_generator(&mut self, name: impl Into<String>, generator: Generator) {
    Arc::make_mut(&mut self.generators).insert(name.into(), generator);
  }

  pub fn generators(&self) -> &BTreeMap<String, Generator> {
    &self.generators
  }

  /// Environment variables handed to tools (`ENV`).
  pub fn exec_env(&self) -> &Arc<BTreeMap<String, String>> {
    &self.exec_env
  }

  pub fn set_exec_env(&mut self, name: impl Into<String>, value: impl Into<String>) {
    Arc::make_mut(&mut self.exec_env).insert(name.into(), value.into());
  }

  /// The `PATH` handed to tools, if any.
  pub fn tool_path(&self) -> Option<&str> {
    self.exec_env.get("PATH").map(String::as_str)
  }

  /// Expand a template against this environment into a single string.
  pub fn subst(&self, template: &str) -> Result<String, CompositionError> {
    subst::subst(template, self)
  }

  /// Snapshot a request to build a shared object from `source`.
  pub fn shared_object(&self, source: impl AsRef<Path>) -> BuildRequest {
    BuildRequest::new(TargetKind::SharedObject, source.as_ref(), self.clone())
  }

  /// Snapshot a request to build a static object from `source`.
  pub fn object(&self, source: impl AsRef<Path>) -> BuildRequest {
    BuildRequest::new(TargetKind::StaticObject, source.as_ref(), self.clone())
  }
}

impl Resolver for Environment {
  fn resolve(&self, name: &str) -> Result<Option<Resolved<'_>>, CompositionError> {
    if let Some(generator) = self.generators.get(name) {
      return Ok(Some(Resolved::Tokens(generator.generate(&self.vars)?)));
    }
    Ok(self.vars.get(name).map(|v| Resolved::Value(Cow::Borrowed(v))))
  }
}
