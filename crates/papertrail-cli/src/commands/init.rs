//! Module for writing a starting configuration.

use super::*;

/// Arguments for [`Commands::Init`]
#[derive(Args, Clone, Debug, Default)]
pub struct InitArgs {
  /// Put the snapshot, verification log, HTML page and Markdown summary under this directory
  #[arg(long)]
  pub output_dir: Option<PathBuf>,
}

/// Function for the [`Commands::Init`] in the CLI.
///
/// Writes the default configuration to `path`, asking before replacing an existing file.
pub fn init<I: UserInteraction>(interaction: &I, path: &Path, args: InitArgs) -> Result<()> {
  if path.exists()
    && !interaction
      .confirm(&format!("A configuration already exists at {}, overwrite it?", path.display()))?
  {
    interaction.reply(ResponseContent::Info("Keeping the existing configuration"))?;
    return Ok(());
  }

  let config = match args.output_dir {
    Some(dir) => Config::default().with_output_dir(dir),
    None => Config::default(),
  };
  config.save(path)?;

  interaction.reply(ResponseContent::Success(&format!(
    "Wrote default configuration to {}",
    path.display()
  )))?;
  interaction.reply(ResponseContent::Info(&format!(
    "Tracking {} keywords in {}; edit the file to change them",
    config.query.keywords.len(),
    config.query.categories.join(", ")
  )))
}
