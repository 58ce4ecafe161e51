mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

/// vpbuild - build the viewport WebAssembly bundle into the frontend
#[derive(Parser)]
#[command(name = "vpbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Project root containing `viewport/` and `frontend/`
  #[arg(long, global = true, default_value = ".")]
  root: PathBuf,

  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Compile the crate, generate bindings, patch the loader and copy artifacts
  Build {
    /// `release` for an optimized build; anything else, or nothing, builds debug
    #[arg(value_name = "PROFILE", allow_hyphen_values = true)]
    profile: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    output: OutputFormat,
  },

  /// Remove the staging directory and all distributed artifacts
  Clean {
    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    output: OutputFormat,
  },

  /// Package in dev mode, refresh frontend dependencies and run the dev server
  Dev,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Build { profile, output } => cmd::cmd_build(&cli.root, profile.as_deref(), output),
    Commands::Clean { output } => cmd::cmd_clean(&cli.root, output),
    Commands::Dev => cmd::cmd_dev(&cli.root),
  }
}
