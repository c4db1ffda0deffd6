use std::fmt;
use std::str::FromStr;

/// Operating system families with distinct build conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
  Linux,
  MacOs,
  Windows,
}

impl Os {
  /// Detect the operating system this binary was built for
  pub fn current() -> Option<Self> {
    match std::env::consts::OS {
      "linux" => Some(Self::Linux),
      "macos" => Some(Self::MacOs),
      "windows" => Some(Self::Windows),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::MacOs => "darwin",
      Self::Windows => "windows",
    }
  }

  pub fn is_windows(&self) -> bool {
    matches!(self, Self::Windows)
  }

  /// Default `PATH` handed to build tools.
  ///
  /// Tools run with a fixed search path rather than the invoking user's, so
  /// that a build behaves the same from any shell.
  pub fn default_tool_path(&self) -> &'static str {
    match self {
      Self::Linux => "/usr/local/bin:/opt/bin:/bin:/usr/bin:/snap/bin",
      Self::MacOs => "/usr/local/bin:/opt/homebrew/bin:/opt/bin:/bin:/usr/bin",
      Self::Windows => r"C:\Windows\System32;C:\Windows",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Os {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "linux" => Ok(Self::Linux),
      "darwin" | "macos" => Ok(Self::MacOs),
      "windows" => Ok(Self::Windows),
      other => Err(format!("unsupported os: {other}")),
    }
  }
}
