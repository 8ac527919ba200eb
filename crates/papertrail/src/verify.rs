//! Link reachability checks and repair.
//!
//! Every record's canonical URL (and document URL, if any) is probed with a `HEAD` request. When
//! the canonical URL is unreachable, both links are rebuilt from the identifier using the
//! configured templates; the rebuilt links replace the stored ones only if the rebuilt canonical
//! URL answers. A record that cannot be repaired keeps its stale links and is reported as broken.
//!
//! Probe failures of any kind (timeouts, refused connections, error statuses) count as
//! unreachable and never abort the run.
//!
//! # Examples
//!
//! ```no_run
//! use chrono::Utc;
//! use papertrail::{config::LinkConfig, snapshot::Snapshot, verify::LinkVerifier};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut snapshot = Snapshot::load_or_empty("docs/papers.json");
//! let verifier = LinkVerifier::new(LinkConfig::default())?;
//! let log = verifier.verify_all(&mut snapshot.papers, Utc::now()).await;
//! println!("{} broken, {} repaired", log.broken, log.updated);
//! # Ok(())
//! # }
//! ```

use super::*;

/// Final state of a record's canonical link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
  /// The stored link answered
  Accessible,
  /// The stored link was dead and has been replaced by the rebuilt one
  Updated,
  /// Neither the stored nor the rebuilt link answered
  Broken,
}

/// Outcome of checking one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkCheck {
  /// Record identifier
  pub id:              String,
  /// Canonical URL as stored before the check
  pub original_url:    String,
  /// What happened to the link
  pub status:          LinkStatus,
  /// The rebuilt canonical URL, when it replaced the stored one
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub replacement_url: Option<String>,
  /// Whether the stored document URL answered, when there was one
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pdf_accessible:  Option<bool>,
}

/// Report written after a verification pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationLog {
  /// When the pass ran
  pub timestamp:     DateTime<Utc>,
  /// Records checked
  pub total_checked: usize,
  /// Records whose canonical link works after the pass, including repaired ones
  pub accessible:    usize,
  /// Records whose canonical link is still dead
  pub broken:        usize,
  /// Records whose links were replaced
  pub updated:       usize,
  /// One entry per record, in record order
  pub details:       Vec<LinkCheck>,
}

/// Probes and repairs paper links.
#[derive(Debug)]
pub struct LinkVerifier {
  /// Internal web client used for `HEAD` probes.
  client: reqwest::Client,
  /// Templates used to rebuild links
  links:  LinkConfig,
}

impl LinkVerifier {
  /// Creates a verifier whose probes time out after the configured link timeout.
  pub fn new(links: LinkConfig) -> Result<Self> {
    let client = reqwest::Client::builder().timeout(links.timeout()).build()?;
    Ok(Self { client, links })
  }

  /// Checks every paper in place and summarizes the pass.
  pub async fn verify_all(&self, papers: &mut [Paper], now: DateTime<Utc>) -> VerificationLog {
    info!("Verifying links for {} papers", papers.len());

    let mut details = Vec::with_capacity(papers.len());
    for paper in papers.iter_mut() {
      details.push(self.verify_paper(paper).await);
    }

    let log = VerificationLog::from_details(details, now);
    info!(
      "Checked {} links: {} accessible, {} broken, {} updated",
      log.total_checked, log.accessible, log.broken, log.updated
    );
    log
  }

  /// Checks one paper, rewriting its links if they can be repaired.
  pub async fn verify_paper(&self, paper: &mut Paper) -> LinkCheck {
    let original_url = paper.url.clone();
    let canonical_ok = self.is_reachable(&paper.url).await;

    let pdf_accessible = match &paper.pdf_url {
      Some(pdf_url) => Some(self.is_reachable(pdf_url).await),
      None => None,
    };

    let mut check = LinkCheck {
      id: paper.id.clone(),
      original_url,
      status: LinkStatus::Accessible,
      replacement_url: None,
      pdf_accessible,
    };
    if canonical_ok {
      return check;
    }

    let rebuilt_url = self.links.canonical_url(&paper.id);
    if self.is_reachable(&rebuilt_url).await {
      info!("Repaired link for {}: {} -> {rebuilt_url}", paper.id, paper.url);
      paper.url = rebuilt_url.clone();
      paper.pdf_url = Some(self.links.document_url(&paper.id));
      check.status = LinkStatus::Updated;
      check.replacement_url = Some(rebuilt_url);
    } else {
      warn!("Broken link for {}: {}", paper.id, paper.url);
      check.status = LinkStatus::Broken;
    }
    check
  }

  /// Whether `url` answers a `HEAD` request with a success status, following redirects.
  pub async fn is_reachable(&self, url: &str) -> bool {
    match self.client.head(url).send().await {
      Ok(response) => {
        let status = response.status();
        trace!("HEAD {url} -> {status}");
        status.is_success()
      },
      Err(e) => {
        debug!("HEAD {url} failed: {e}");
        false
      },
    }
  }
}

impl VerificationLog {
  /// Tallies per-record results. Each record counts once, as accessible or broken, by its final
  /// state.
  pub fn from_details(details: Vec<LinkCheck>, timestamp: DateTime<Utc>) -> Self {
    let count = |status| details.iter().filter(|check| check.status == status).count();
    let updated = count(LinkStatus::Updated);
    let broken = count(LinkStatus::Broken);
    let accessible = count(LinkStatus::Accessible) + updated;
    Self { timestamp, total_checked: details.len(), accessible, broken, updated, details }
  }

  /// Writes the report to `path` as pretty-printed JSON.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    snapshot::write_json(path.as_ref(), self)
  }
}
