mod cmd;
mod output;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use anglebuild_lib::pipeline::PipelineError;

use crate::output::{OutputFormat, print_error};

/// anglebuild - fetch, build and package a pinned ANGLE revision
#[derive(Parser)]
#[command(name = "anglebuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Build configuration: release or debug (case-insensitive)
  #[arg(long, env = "ANGLEBUILD_CONFIG", default_value = "release")]
  config: String,

  /// Directory holding commit.txt and build/ (default: current directory)
  #[arg(long, env = "ANGLEBUILD_ROOT")]
  root: Option<PathBuf>,

  /// Print the commands a build would run without running anything
  #[arg(long)]
  dry_run: bool,

  /// Output format for the final summary
  #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  /// Enable debug logging
  #[arg(short, long)]
  verbose: bool,
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = cmd::resolve_target(cli.root.as_deref(), &cli.config).and_then(|target| {
    if cli.dry_run {
      cmd::cmd_plan(&target, cli.output)
    } else {
      cmd::cmd_build(&target, cli.output)
    }
  });

  if let Err(err) = result {
    print_error(&format!("{:#}", err));
    std::process::exit(exit_code(&err));
  }
}

/// A failed tool's exit code passes through; configuration and filesystem
/// errors exit with 1.
fn exit_code(err: &anyhow::Error) -> i32 {
  err.downcast_ref::<PipelineError>().map_or(1, PipelineError::exit_code)
}
