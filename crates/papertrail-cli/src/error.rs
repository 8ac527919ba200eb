//! Error types for the command line runner.

use thiserror::Error;

use super::*;

/// Result alias for CLI operations.
pub type Result<T> = core::result::Result<T, PapertrailCliError>;

/// Errors that can occur while running a CLI command.
#[derive(Error, Debug)]
pub enum PapertrailCliError {
  /// A pipeline stage failed
  #[error(transparent)]
  Papertrail(#[from] PapertrailError),

  /// Reading or writing a local file failed
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// A terminal prompt failed
  #[error(transparent)]
  Dialoguer(#[from] dialoguer::Error),

  /// A configuration file passed with `--config` does not exist
  #[error("No configuration file at {}. Run `papertrail init` to create one.", .0.display())]
  MissingConfig(PathBuf),

  /// The `--log-file` path does not name a file
  #[error("Not a usable log file path: {}", .0.display())]
  InvalidLogFile(PathBuf),
}
