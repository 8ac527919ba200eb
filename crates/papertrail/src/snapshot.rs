//! The persisted record set from the previous run.
//!
//! A snapshot is read once at the start of a run and rewritten once at the end. A snapshot that
//! is missing, empty or unreadable is treated as "no prior data" rather than an error, so a
//! corrupted backup never blocks the next scheduled update.

use super::*;

/// JSON document holding the retained papers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
  /// When the snapshot was written
  pub last_updated: DateTime<Utc>,
  /// Number of papers, kept alongside the list for readers of the raw file
  pub total:        usize,
  /// Retained papers, newest first
  pub papers:       Vec<Paper>,
}

impl Snapshot {
  /// Wraps `papers`, stamped with `last_updated`.
  pub fn new(papers: Vec<Paper>, last_updated: DateTime<Utc>) -> Self {
    Self { last_updated, total: papers.len(), papers }
  }

  /// Reads the snapshot at `path`, falling back to an empty snapshot on any failure.
  pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
    let path = path.as_ref();
    match Self::load(path) {
      Ok(Some(snapshot)) => {
        info!("Loaded {} papers from {}", snapshot.papers.len(), path.display());
        snapshot
      },
      Ok(None) => {
        info!("No snapshot at {}, starting empty", path.display());
        Self::default()
      },
      Err(e) => {
        warn!("Could not load snapshot {}, starting empty: {e}", path.display());
        Self::default()
      },
    }
  }

  /// Reads the snapshot at `path`.
  ///
  /// Returns `Ok(None)` if the file does not exist or is blank.
  ///
  /// # Errors
  ///
  /// Fails if the file cannot be read or is not a snapshot document.
  pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
    let path = path.as_ref();
    if !path.exists() {
      return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
      return Ok(None);
    }
    Ok(Some(serde_json::from_str(&content)?))
  }

  /// Writes the snapshot to `path` as pretty-printed JSON, replacing any previous file and
  /// creating parent directories.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> { write_json(path.as_ref(), self) }
}

impl Default for Snapshot {
  fn default() -> Self { Self::new(Vec::new(), DateTime::<Utc>::default()) }
}

/// Serializes `value` as pretty-printed JSON to `path`.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
  create_parent_dir(path)?;
  let json = serde_json::to_string_pretty(value)?;
  std::fs::write(path, json)?;
  debug!("Wrote {}", path.display());
  Ok(())
}
