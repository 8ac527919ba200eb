//! The paper record tracked across runs, and arXiv identifier handling.
//!
//! A [`Paper`] is created by the [`retriever`](crate::retriever) from an Atom feed entry,
//! possibly overwritten by the [`merge`](crate::merge) stage when the same identifier shows up
//! again, and dropped only when the retained set is truncated.
//!
//! Identifiers are stored without their version suffix so that `2301.07041v1` and
//! `2301.07041v3` refer to the same record:
//!
//! ```
//! use papertrail::paper::identifier_from_entry_id;
//!
//! let id = identifier_from_entry_id("http://arxiv.org/abs/2301.07041v3").unwrap();
//! assert_eq!(id, "2301.07041");
//!
//! let id = identifier_from_entry_id("http://arxiv.org/abs/math.AG/0601001v1").unwrap();
//! assert_eq!(id, "math.AG/0601001");
//! ```

use super::*;

/// Metadata for one tracked publication.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use papertrail::paper::Paper;
///
/// let paper = Paper::new(
///   "2301.07041",
///   "Verifiable Fully Homomorphic Encryption",
///   vec!["Alexander Viand".into(), "Christian Knabenhans".into()],
///   Utc.with_ymd_and_hms(2023, 1, 17, 0, 0, 0).unwrap(),
/// );
/// assert_eq!(paper.author_display, "Alexander Viand, Christian Knabenhans");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
  /// Versionless arXiv identifier, unique within a retained set
  pub id:               String,
  /// The paper's full title
  pub title:            String,
  /// Author names in listed order
  pub authors:          Vec<String>,
  /// Authors joined for display
  pub author_display:   String,
  /// First submission timestamp
  pub published:        DateTime<Utc>,
  /// Last revision timestamp
  pub updated:          DateTime<Utc>,
  /// Abstract text
  #[serde(default)]
  pub summary:          String,
  /// Category tags, e.g. `math.SG`
  #[serde(default)]
  pub categories:       Vec<String>,
  /// The category arXiv lists first
  #[serde(default)]
  pub primary_category: Option<String>,
  /// Free-form author comment (page counts, venue, ...)
  #[serde(default)]
  pub comment:          Option<String>,
  /// Keyword topics whose query matched this paper
  #[serde(default)]
  pub topics:           Vec<String>,
  /// Canonical landing page
  pub url:              String,
  /// Direct document link
  #[serde(default)]
  pub pdf_url:          Option<String>,
}

impl Paper {
  /// Creates a record with the required metadata and arXiv's default links for `id`.
  ///
  /// Mostly useful for tests and for tools that seed a snapshot by hand; records from the remote
  /// index are built by the retriever.
  pub fn new(
    id: impl Into<String>,
    title: impl Into<String>,
    authors: Vec<String>,
    published: DateTime<Utc>,
  ) -> Self {
    let id = id.into();
    let links = LinkConfig::default();
    Self {
      url: links.canonical_url(&id),
      pdf_url: Some(links.document_url(&id)),
      title: title.into(),
      author_display: author_display(&authors),
      authors,
      published,
      updated: published,
      summary: String::new(),
      categories: Vec::new(),
      primary_category: None,
      comment: None,
      topics: Vec::new(),
      id,
    }
  }

  /// Returns the same record with a different canonical URL.
  pub fn with_url(mut self, url: impl Into<String>) -> Self {
    self.url = url.into();
    self
  }

  /// Returns the same record with a different (or no) document URL.
  pub fn with_pdf_url(mut self, pdf_url: Option<String>) -> Self {
    self.pdf_url = pdf_url;
    self
  }

  /// Returns the same record filed under `topics`.
  pub fn with_topics(mut self, topics: impl IntoIterator<Item = String>) -> Self {
    self.add_topics(topics);
    self
  }

  /// Files the record under every topic in `topics` it is not filed under yet.
  pub fn add_topics(&mut self, topics: impl IntoIterator<Item = String>) {
    for topic in topics {
      if !self.topics.contains(&topic) {
        self.topics.push(topic);
      }
    }
  }

  /// Whether the record is filed under `topic`.
  pub fn has_topic(&self, topic: &str) -> bool { self.topics.iter().any(|t| t == topic) }

  /// Returns the same record tagged with `categories`.
  pub fn with_categories(mut self, categories: Vec<String>) -> Self {
    self.primary_category = categories.first().cloned();
    self.categories = categories;
    self
  }
}

impl Display for Paper {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "[{}] {} ({})", self.id, self.title, self.published.format("%Y-%m-%d"))
  }
}

/// Joins author names the way they are shown in every rendered output.
pub fn author_display(authors: &[String]) -> String { authors.join(", ") }

/// Extracts the versionless identifier from an arXiv entry id or URL.
///
/// Accepts `http://arxiv.org/abs/<id>`, `https://arxiv.org/pdf/<id>` and bare identifiers. Only a
/// trailing `v<digits>` is removed, so old-style archive names containing a `v` survive.
pub fn identifier_from_entry_id(entry_id: &str) -> Result<String> {
  lazy_static! {
    static ref ARXIV_PATH: Regex = Regex::new(r"(?:abs|pdf)/(.+?)(?:\.pdf)?$").unwrap();
    static ref VERSION: Regex = Regex::new(r"v\d+$").unwrap();
  }

  let raw = ARXIV_PATH
    .captures(entry_id.trim())
    .and_then(|cap| cap.get(1))
    .map_or(entry_id.trim(), |m| m.as_str());

  let id = VERSION.replace(raw, "");
  if id.is_empty() || id.contains("://") {
    return Err(PapertrailError::InvalidIdentifier(entry_id.to_owned()));
  }
  Ok(id.into_owned())
}
