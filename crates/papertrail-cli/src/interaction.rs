//! Terminal output and prompts.

use console::Emoji;
use dialoguer::Confirm;

use super::*;

/// Prefix for information messages
pub static INFO_PREFIX: &str = "ℹ ";
/// Prefix for success messages
pub static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for error messages
pub static ERROR_PREFIX: &str = "✗ ";
/// Prefix for warning messages
pub static WARNING_PREFIX: &str = "! ";
/// Prefix for user prompts
pub static PROMPT_PREFIX: &str = "❯ ";
/// Branch character for tree structure
pub static TREE_BRANCH: &str = "├";
/// Leaf character for tree structure (end of branch)
pub static TREE_LEAF: &str = "└";

/// Something to show the user.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// The result of a pipeline run
  Summary(&'a RunSummary),
  /// A completed action
  Success(&'a str),
  /// A failure
  Error(&'a PapertrailCliError),
  /// Something worth knowing that needs no action
  Info(&'a str),
  /// Something that may need attention
  Warning(&'a str),
}

/// How commands talk to the person running them.
pub trait UserInteraction {
  /// Asks a yes/no question.
  fn confirm(&self, message: &str) -> Result<bool>;

  /// Shows `content`.
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

impl UserInteraction for Cli {
  fn confirm(&self, message: &str) -> Result<bool> {
    if self.accept_defaults {
      return Ok(true);
    }
    let prompt = format!("{}{message}", style(PROMPT_PREFIX).cyan());
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
  }

  fn reply(&self, content: ResponseContent) -> Result<()> {
    match content {
      ResponseContent::Summary(summary) => print_summary(summary),
      ResponseContent::Success(message) =>
        println!("{}{}", style(SUCCESS_PREFIX).green(), style(message).green()),
      ResponseContent::Error(e) => eprintln!("{}{}", style(ERROR_PREFIX).red(), style(e).red()),
      ResponseContent::Info(message) => println!("{}{message}", style(INFO_PREFIX).blue()),
      ResponseContent::Warning(message) =>
        println!("{}{}", style(WARNING_PREFIX).yellow(), style(message).yellow()),
    }
    Ok(())
  }
}

/// Prints what a run did as a small tree.
fn print_summary(summary: &RunSummary) {
  if let RunOutcome::Skipped { reason } = &summary.outcome {
    println!("{}Nothing to do for {}: {reason}", style(INFO_PREFIX).blue(), summary.mode);
    return;
  }

  println!(
    "{}{}Finished {} run",
    style(SUCCESS_PREFIX).green(),
    Emoji("📚 ", ""),
    style(summary.mode).bold()
  );

  let mut lines = Vec::new();
  if matches!(summary.mode, Mode::Update | Mode::Historical { .. }) {
    let mut fetched = format!("Fetched: {} papers", summary.fetched);
    if summary.failed_queries > 0 {
      fetched.push_str(&format!(" ({} queries failed)", summary.failed_queries));
    }
    lines.push(fetched);
  }
  if let Some(log) = &summary.verification {
    lines.push(format!(
      "Links: {} checked, {} accessible, {} broken, {} updated",
      log.total_checked, log.accessible, log.broken, log.updated
    ));
  }
  lines.push(format!("Retained: {} papers", summary.retained));
  for path in &summary.written {
    lines.push(format!("Wrote {}", path.display()));
  }

  let last = lines.len().saturating_sub(1);
  for (position, line) in lines.iter().enumerate() {
    let branch = if position == last { TREE_LEAF } else { TREE_BRANCH };
    println!("   {} {line}", style(branch).dim());
  }
}
