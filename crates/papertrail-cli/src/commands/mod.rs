use super::*;

pub mod init;
pub mod run;

pub use init::{init, InitArgs};
pub use run::run;

/// Available commands for the CLI
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
  /// Write a default configuration file
  Init(InitArgs),

  /// Fetch recent papers, merge them into the snapshot and publish (default)
  Update,

  /// Check every stored link, repair broken ones and publish
  Verify,

  /// Backfill whole years of papers and publish
  Historical(HistoricalArgs),

  /// Re-render the stored papers without any network access
  Render,
}

/// Arguments for [`Commands::Historical`]
#[derive(Args, Clone, Debug)]
pub struct HistoricalArgs {
  /// First year to collect
  #[arg(long)]
  pub start_year: i32,

  /// Last year to collect, defaults to the current year
  #[arg(long)]
  pub end_year: Option<i32>,
}
