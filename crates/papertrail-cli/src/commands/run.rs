//! Runs one pipeline mode.

use super::*;

/// Function for every pipeline command: [`Commands::Update`], [`Commands::Verify`],
/// [`Commands::Historical`] and [`Commands::Render`].
pub async fn run<I: UserInteraction>(interaction: &I, config: Config, mode: Mode) -> Result<()> {
  if let Mode::Historical { start_year, end_year } = mode {
    let through = end_year.map_or_else(|| "the current year".to_owned(), |year| year.to_string());
    interaction.reply(ResponseContent::Info(&format!(
      "Collecting papers from {start_year} through {through}, this can take a while"
    )))?;
  }

  let summary = Pipeline::new(config)?.run(mode).await?;
  if summary.failed_queries > 0 && summary.fetched == 0 {
    interaction.reply(ResponseContent::Warning(
      "No papers were fetched, the stored papers were published unchanged",
    ))?;
  }
  interaction.reply(ResponseContent::Summary(&summary))
}
