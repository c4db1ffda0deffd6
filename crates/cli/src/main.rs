mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::ScriptArgs;

/// construct - build objects from construct.lua scripts
#[derive(Parser)]
#[command(name = "construct")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build targets declared in a build script
  Build {
    /// Artifacts or sources to build (default: everything)
    targets: Vec<String>,

    #[command(flatten)]
    script: ScriptArgs,

    /// Number of builds to run in parallel
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Print the commands without running them
    #[arg(short = 'n', long)]
    dry_run: bool,
  },

  /// Show the commands a build would run
  Plan {
    /// Artifacts or sources to plan (default: everything)
    targets: Vec<String>,

    #[command(flatten)]
    script: ScriptArgs,

    /// Output as JSON
    #[arg(long)]
    json: bool,
  },

  /// Show platform and tool information
  Info,

  /// Create a construct.lua build script
  Init {
    /// Project directory
    #[arg(default_value = ".")]
    path: PathBuf,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Build {
      targets,
      script,
      jobs,
      dry_run,
    } => cmd::cmd_build(&script, &targets, jobs, dry_run, cli.verbose),
    Commands::Plan { targets, script, json } => cmd::cmd_plan(&script, &targets, json),
    Commands::Info => cmd::cmd_info(),
    Commands::Init { path } => cmd::cmd_init(&path),
  }
}
