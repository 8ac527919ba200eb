//! Command line runner for the `papertrail` arXiv digest.
//!
//! Each invocation runs one pipeline mode against the configured keyword and category filters and
//! rewrites the snapshot, HTML page and Markdown summary. It is meant to be called from a
//! scheduler (cron, a CI workflow) rather than kept running.
//!
//! # Usage
//!
//! ```bash
//! # Write a default configuration
//! papertrail init
//!
//! # Fetch recent papers and publish (the default command)
//! papertrail update
//!
//! # Probe and repair the stored links
//! papertrail verify
//!
//! # Backfill 2015 through the current year
//! papertrail historical --start-year 2015
//!
//! # Re-render the stored papers only
//! papertrail render
//! ```
//!
//! Use `-v` (repeatable) for more logging, or set `RUST_LOG` for fine-grained filters.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use clap::{builder::ArgAction, Args, Parser, Subcommand};
use console::style;
use papertrail::{
  config::Config,
  pipeline::{Mode, Pipeline, RunOutcome, RunSummary},
  prelude::*,
};
use tracing::{debug, error, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod error;
pub mod interaction;

use crate::{commands::*, error::*, interaction::*};

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Scheduled arXiv digest: fetch, merge, verify and render")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Path to the configuration file. If not specified, uses the default platform-specific
  /// configuration directory.
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  /// Also write logs to this file
  #[arg(long, global = true)]
  log_file: Option<PathBuf>,

  /// The subcommand to execute, `update` if absent
  #[command(subcommand)]
  command: Option<Commands>,

  /// Skip all prompts and accept defaults
  #[arg(long, global = true)]
  accept_defaults: bool,
}

impl Cli {
  /// The configuration file this invocation reads or writes.
  pub fn config_path(&self) -> PathBuf { self.config.clone().unwrap_or_else(Config::default_path) }

  /// Loads the configuration, falling back to the defaults when no file exists at the default
  /// location.
  ///
  /// # Errors
  ///
  /// Fails if a file given with `--config` does not exist, or if the file is invalid.
  pub fn load_config(&self) -> Result<Config> {
    let path = self.config_path();
    if path.exists() {
      return Ok(Config::load(&path)?);
    }
    if self.config.is_some() {
      return Err(PapertrailCliError::MissingConfig(path));
    }
    warn!("No configuration at {}, using defaults", path.display());
    Ok(Config::default())
  }
}

/// Configures the logging system based on the verbosity level
///
/// The verbosity levels are:
/// - 0: warn (default)
/// - 1: info
/// - 2: debug
/// - 3+: trace
///
/// `RUST_LOG` takes precedence when set. With a log file, output goes through a non-blocking
/// writer whose guard must be held until the program exits.
fn setup_logging(verbosity: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
  let filter = match verbosity {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
  let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

  match log_file {
    Some(path) => {
      let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
      };
      let file_name = path
        .file_name()
        .ok_or_else(|| PapertrailCliError::InvalidLogFile(path.to_path_buf()))?;
      std::fs::create_dir_all(directory)?;

      let appender = tracing_appender::rolling::never(directory, file_name);
      let (writer, guard) = tracing_appender::non_blocking(appender);
      builder.with_writer(writer).with_ansi(false).init();
      Ok(Some(guard))
    },
    None => {
      builder.with_writer(std::io::stderr).init();
      Ok(None)
    },
  }
}

/// Dispatches `command`, loading the configuration for pipeline commands.
async fn execute(cli: &Cli, command: Commands) -> Result<()> {
  match command {
    Commands::Init(args) => init(cli, &cli.config_path(), args),
    Commands::Update => run(cli, cli.load_config()?, Mode::Update).await,
    Commands::Verify => run(cli, cli.load_config()?, Mode::VerifyLinks).await,
    Commands::Historical(HistoricalArgs { start_year, end_year }) =>
      run(cli, cli.load_config()?, Mode::Historical { start_year, end_year }).await,
    Commands::Render => run(cli, cli.load_config()?, Mode::Render).await,
  }
}

/// Entry point for the papertrail CLI application
///
/// Parses arguments, sets up logging and runs the requested command. Failures are logged,
/// reported on the terminal and returned, so the process exits with a non-zero status.
#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let _guard = setup_logging(cli.verbose, cli.log_file.as_deref())?;

  let command = cli.command.clone().unwrap_or(Commands::Update);
  debug!("Running {command:?}");

  let result = execute(&cli, command).await;

  if let Err(e) = &result {
    error!("{e}");
    cli.reply(ResponseContent::Error(e))?;
  }
  result
}
