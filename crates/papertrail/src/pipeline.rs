//! The stages wired together, once per invocation.
//!
//! Every mode runs sequentially in a single task:
//!
//! | Mode                  | Network          | Writes                                     |
//! |-----------------------|------------------|--------------------------------------------|
//! | [`Mode::Update`]      | keyword queries  | snapshot, HTML, Markdown                   |
//! | [`Mode::VerifyLinks`] | link probes      | snapshot, verification log, HTML, Markdown |
//! | [`Mode::Historical`]  | per-year queries | snapshot, HTML, Markdown                   |
//! | [`Mode::Render`]      | none             | HTML, Markdown                             |
//!
//! Link verification is skipped entirely, with no network access and no output, when there is no
//! prior snapshot to verify.

use super::*;
use crate::{
  render::{write_outputs, RenderOptions},
  retriever::Retriever,
  snapshot::Snapshot,
  verify::{LinkVerifier, VerificationLog},
};

/// What a run should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  /// Fetch recent papers, merge them into the snapshot and render
  Update,
  /// Probe and repair the links of the stored papers, then render
  VerifyLinks,
  /// Backfill whole years of papers, merge them into the snapshot and render
  Historical {
    /// First year collected
    start_year: i32,
    /// Last year collected, the current year if absent
    end_year:   Option<i32>,
  },
  /// Re-render the stored papers without touching the network
  Render,
}

/// Whether the run did its work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
  /// All stages ran
  Completed,
  /// Nothing was done
  Skipped {
    /// Why the run stopped early
    reason: String,
  },
}

/// What a run did.
#[derive(Debug, Clone)]
pub struct RunSummary {
  /// The mode that ran
  pub mode:           Mode,
  /// Whether the stages ran
  pub outcome:        RunOutcome,
  /// Papers fetched from the remote index
  pub fetched:        usize,
  /// Queries that failed and were skipped
  pub failed_queries: usize,
  /// Papers in the snapshot after the run
  pub retained:       usize,
  /// Link check report, in [`Mode::VerifyLinks`]
  pub verification:   Option<VerificationLog>,
  /// Files written
  pub written:        Vec<PathBuf>,
}

/// Runs the fetch, merge, verify and render stages for a configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
  /// Settings for every stage
  config: Config,
}

impl Pipeline {
  /// Creates a pipeline after validating `config`.
  ///
  /// # Errors
  ///
  /// Returns [`PapertrailError::Config`] if the configuration is unusable.
  pub fn new(config: Config) -> Result<Self> {
    config.validate()?;
    Ok(Self { config })
  }

  /// The configuration this pipeline runs with.
  pub fn config(&self) -> &Config { &self.config }

  /// Runs `mode` stamped with the current time.
  pub async fn run(&self, mode: Mode) -> Result<RunSummary> { self.run_at(mode, Utc::now()).await }

  /// Runs `mode` as if the current time were `now`.
  pub async fn run_at(&self, mode: Mode, now: DateTime<Utc>) -> Result<RunSummary> {
    info!("Starting {mode} run");
    let summary = match mode {
      Mode::Update => self.update(now).await?,
      Mode::VerifyLinks => self.verify_links(now).await?,
      Mode::Historical { start_year, end_year } => {
        let end_year = end_year.unwrap_or_else(|| now.year());
        if start_year > end_year {
          return Err(PapertrailError::Config(format!(
            "start year {start_year} is after end year {end_year}"
          )));
        }
        self.historical(mode, start_year, end_year, now).await?
      },
      Mode::Render => self.render(now)?,
    };
    match &summary.outcome {
      RunOutcome::Completed => info!("{mode} run completed, {} papers retained", summary.retained),
      RunOutcome::Skipped { reason } => info!("{mode} run skipped: {reason}"),
    }
    Ok(summary)
  }

  /// Fetch, merge, save, render.
  async fn update(&self, now: DateTime<Utc>) -> Result<RunSummary> {
    let fetched = Retriever::new(self.config.query.clone())?.fetch_recent(now).await;
    if fetched.queries > 0 && fetched.failures == fetched.queries {
      error!("Every query failed, keeping the stored papers");
    }
    self.merge_and_publish(Mode::Update, fetched, now)
  }

  /// Backfill `start_year..=end_year`, merge, save, render.
  async fn historical(
    &self,
    mode: Mode,
    start_year: i32,
    end_year: i32,
    now: DateTime<Utc>,
  ) -> Result<RunSummary> {
    let fetched =
      Retriever::new(self.config.query.clone())?.fetch_historical(start_year, end_year).await;
    self.merge_and_publish(mode, fetched, now)
  }

  /// Probe the stored links, save the repaired snapshot and the report, render.
  async fn verify_links(&self, now: DateTime<Utc>) -> Result<RunSummary> {
    let output = &self.config.output;
    let mut snapshot = Snapshot::load_or_empty(&output.snapshot_path);
    if snapshot.papers.is_empty() {
      let reason = format!("No snapshot with papers at {}", output.snapshot_path.display());
      return Ok(RunSummary::skipped(Mode::VerifyLinks, reason));
    }

    let verifier = LinkVerifier::new(self.config.links.clone())?;
    let log = verifier.verify_all(&mut snapshot.papers, now).await;

    let snapshot = Snapshot::new(snapshot.papers, now);
    snapshot.save(&output.snapshot_path)?;
    log.save(&output.verification_log_path)?;

    let mut written = vec![output.snapshot_path.clone(), output.verification_log_path.clone()];
    written.extend(write_outputs(&snapshot.papers, output, &self.render_options(now))?);

    Ok(RunSummary {
      mode: Mode::VerifyLinks,
      outcome: RunOutcome::Completed,
      fetched: 0,
      failed_queries: 0,
      retained: snapshot.total,
      verification: Some(log),
      written,
    })
  }

  /// Render the stored papers.
  fn render(&self, now: DateTime<Utc>) -> Result<RunSummary> {
    let output = &self.config.output;
    let snapshot = Snapshot::load_or_empty(&output.snapshot_path);
    let written = write_outputs(&snapshot.papers, output, &self.render_options(now))?;
    Ok(RunSummary {
      mode: Mode::Render,
      outcome: RunOutcome::Completed,
      fetched: 0,
      failed_queries: 0,
      retained: snapshot.papers.len(),
      verification: None,
      written,
    })
  }

  /// Merges `fetched` into the stored snapshot, saves it and renders it.
  fn merge_and_publish(
    &self,
    mode: Mode,
    fetched: retriever::Fetched,
    now: DateTime<Utc>,
  ) -> Result<RunSummary> {
    let output = &self.config.output;
    let stored = Snapshot::load_or_empty(&output.snapshot_path);
    let fetched_count = fetched.papers.len();

    let merged = merge(fetched.papers.into_vec(), stored.papers, output.max_papers);
    let snapshot = Snapshot::new(merged, now);
    snapshot.save(&output.snapshot_path)?;

    let mut written = vec![output.snapshot_path.clone()];
    written.extend(write_outputs(&snapshot.papers, output, &self.render_options(now))?);

    Ok(RunSummary {
      mode,
      outcome: RunOutcome::Completed,
      fetched: fetched_count,
      failed_queries: fetched.failures,
      retained: snapshot.total,
      verification: None,
      written,
    })
  }

  /// Render settings for a run at `now`.
  fn render_options(&self, now: DateTime<Utc>) -> RenderOptions {
    RenderOptions::from_config(&self.config, now)
  }
}

impl RunSummary {
  /// A run that stopped before doing anything.
  fn skipped(mode: Mode, reason: impl Into<String>) -> Self {
    Self {
      mode,
      outcome: RunOutcome::Skipped { reason: reason.into() },
      fetched: 0,
      failed_queries: 0,
      retained: 0,
      verification: None,
      written: Vec::new(),
    }
  }

  /// Whether the run stopped early.
  pub fn is_skipped(&self) -> bool { matches!(self.outcome, RunOutcome::Skipped { .. }) }
}

impl Display for Mode {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Update => write!(f, "update"),
      Self::VerifyLinks => write!(f, "link verification"),
      Self::Historical { start_year, end_year: Some(end_year) } =>
        write!(f, "historical ({start_year}-{end_year})"),
      Self::Historical { start_year, end_year: None } => write!(f, "historical ({start_year}-)"),
      Self::Render => write!(f, "render"),
    }
  }
}
