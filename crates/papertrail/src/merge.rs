//! Identifier-keyed paper collections and the snapshot merge.
//!
//! The merge keeps three invariants on the retained set:
//! - no two records share an identifier,
//! - the set never grows past the configured maximum,
//! - records are ordered by publication date, newest first, with ties kept in insertion order.
//!
//! A replaced record hands its topics on to its replacement, so a paper stays filed under every
//! keyword that ever matched it while it is retained.
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use papertrail::{merge::merge, paper::Paper};
//!
//! let day = |d| Utc.with_ymd_and_hms(2024, 3, d, 0, 0, 0).unwrap();
//! let stored = vec![Paper::new("1234.5678", "Old title", vec![], day(1))];
//! let fresh = vec![
//!   Paper::new("1234.5678", "New title", vec![], day(1)),
//!   Paper::new("2403.00002", "Another", vec![], day(2)),
//! ];
//!
//! let merged = merge(fresh, stored, 10);
//! assert_eq!(merged.len(), 2);
//! assert_eq!(merged[0].id, "2403.00002");
//! assert_eq!(merged[1].title, "New title");
//! ```

use super::*;

/// An insertion-ordered set of papers keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct PaperSet {
  /// Records in insertion order
  papers: Vec<Paper>,
  /// Position of each identifier in `papers`
  index:  HashMap<String, usize>,
}

impl PaperSet {
  /// Creates an empty set.
  pub fn new() -> Self { Self::default() }

  /// Inserts `paper`, replacing any record with the same identifier in place.
  ///
  /// The replacement keeps the topics of the record it replaces. Returns `true` if the identifier
  /// was new.
  pub fn upsert(&mut self, paper: Paper) -> bool {
    match self.index.get(&paper.id) {
      Some(&position) => {
        let replaced = std::mem::replace(&mut self.papers[position], paper);
        self.papers[position].add_topics(replaced.topics);
        false
      },
      None => {
        self.index.insert(paper.id.clone(), self.papers.len());
        self.papers.push(paper);
        true
      },
    }
  }

  /// Inserts `paper` only if its identifier is not present yet.
  ///
  /// Returns `true` if the paper was added.
  pub fn insert_missing(&mut self, paper: Paper) -> bool {
    if self.contains(&paper.id) {
      return false;
    }
    self.upsert(paper)
  }

  /// Files the record with identifier `id`, if present, under `topics` as well.
  pub fn add_topics(&mut self, id: &str, topics: impl IntoIterator<Item = String>) {
    if let Some(&position) = self.index.get(id) {
      self.papers[position].add_topics(topics);
    }
  }

  /// Whether a record with identifier `id` is present.
  pub fn contains(&self, id: &str) -> bool { self.index.contains_key(id) }

  /// Looks up a record by identifier.
  pub fn get(&self, id: &str) -> Option<&Paper> { self.index.get(id).map(|&i| &self.papers[i]) }

  /// Number of records.
  pub fn len(&self) -> usize { self.papers.len() }

  /// Whether the set holds no records.
  pub fn is_empty(&self) -> bool { self.papers.is_empty() }

  /// Iterates over records in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = &Paper> { self.papers.iter() }

  /// Adds every paper from `papers`, last write wins.
  pub fn extend(&mut self, papers: impl IntoIterator<Item = Paper>) {
    for paper in papers {
      self.upsert(paper);
    }
  }

  /// Consumes the set, returning records in insertion order.
  pub fn into_vec(self) -> Vec<Paper> { self.papers }
}

impl FromIterator<Paper> for PaperSet {
  fn from_iter<T: IntoIterator<Item = Paper>>(iter: T) -> Self {
    let mut set = Self::new();
    set.extend(iter);
    set
  }
}

impl IntoIterator for PaperSet {
  type IntoIter = std::vec::IntoIter<Paper>;
  type Item = Paper;

  fn into_iter(self) -> Self::IntoIter { self.papers.into_iter() }
}

/// Merges freshly fetched papers into the stored ones.
///
/// Fresh papers come first and replace earlier fresh papers with the same identifier. Stored
/// papers are appended unless a fresh paper already took their identifier; duplicates among the
/// stored papers resolve to the last one. Topics of every copy of an identifier are kept. The result is sorted newest first (stable) and cut down
/// to `max_papers`.
pub fn merge(fresh: Vec<Paper>, stored: Vec<Paper>, max_papers: usize) -> Vec<Paper> {
  let mut merged = PaperSet::new();
  merged.extend(fresh);
  let fresh_count = merged.len();

  let mut carried = PaperSet::new();
  for paper in stored {
    if merged.contains(&paper.id) {
      merged.add_topics(&paper.id, paper.topics);
    } else {
      carried.upsert(paper);
    }
  }
  for paper in carried {
    merged.insert_missing(paper);
  }

  let mut papers = merged.into_vec();
  sort_newest_first(&mut papers);
  if papers.len() > max_papers {
    debug!("Truncating {} merged papers to {max_papers}", papers.len());
    papers.truncate(max_papers);
  }
  info!("Merged {fresh_count} fresh papers into {} retained", papers.len());
  papers
}

/// Sorts by publication date, newest first, keeping the relative order of equal dates.
pub fn sort_newest_first(papers: &mut [Paper]) { papers.sort_by(|a, b| b.published.cmp(&a.published)); }
